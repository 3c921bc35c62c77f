//! Tool discovery

use anyhow::{Context, Result};
use spriteforge_gen::{PixelLabClient, SpriteConfig};

pub fn run(save: Option<&str>) -> Result<()> {
    let config = SpriteConfig::load()?;
    let client = PixelLabClient::from_config(&config)?;

    println!("Connecting to {}...", client.api_url());
    let tools = client.list_tools()?;

    if tools.is_empty() {
        println!("No tools advertised.");
        return Ok(());
    }

    println!("{} tool(s):\n", tools.len());
    for tool in &tools {
        println!("{}", tool.name);
        if let Some(ref desc) = tool.description {
            println!("  {}", desc.lines().next().unwrap_or(""));
        }
        for param in tool.parameters() {
            let marker = if param.required { " (required)" } else { "" };
            println!("    - {}: {}{}", param.name, param.kind, marker);
        }
    }

    if let Some(path) = save {
        let json = serde_json::to_string_pretty(&tools)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path))?;
        println!("\nTool list saved to: {}", path);
    }

    Ok(())
}
