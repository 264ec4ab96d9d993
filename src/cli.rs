// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-stage")]
#[command(about = "Multi-scene 3D showcase viewer", long_about = None)]
pub struct Cli {
    /// JSON manifest listing project scenes to register
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Register a single project scene showing this glTF model
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Skip the hero scene
    #[arg(long, default_value = "false")]
    pub no_hero: bool,
}
