use anyhow::Result;

pub async fn run() -> Result<()> {
    println!("Authenticating with Google...");

    let account = calmerge_provider_google::auth::authenticate().await?;

    println!("\nAuthenticated as: {}", account);
    println!("\nNow add the account and your calendars to config.json:");
    println!();
    println!("{{");
    println!("  \"google_account\": \"{}\",", account);
    println!("  \"input_calendar_ids\": [\"...\"],");
    println!("  \"output_calendar_id\": \"...\"");
    println!("}}");
    println!();
    println!("Then run `calmerge status` to preview, and `calmerge sync` to start merging.");

    Ok(())
}
