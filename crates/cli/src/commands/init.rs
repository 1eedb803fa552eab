//! `siemguide init`: Write a starter config file.

use siemguide_config::AppConfig;

pub async fn run() -> super::CmdResult {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🛡️  SiemGuide — First-Time Setup");
    println!("===============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Get a free Groq key at https://console.groq.com/keys");
    println!("   2. Put it under [credentials] as GROQ_API_KEY (or export it)");
    println!("   3. Run: siemguide chat palo_alto\n");

    Ok(())
}
