// Command line and config file for the windowed host.
//
// Config file layout (TOML):
//
//   [window]
//   title = "Scratch me"
//   width = 480
//   height = 320
//
//   [panel]
//   foreground = "front.png"
//   background = "#204060"
//   threshold = 60

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use scratch_panel::PanelOptions;

#[derive(Debug, Parser)]
#[command(name = "scratch-panel", about = "Scratch off a foreground image to reveal the background")]
pub struct Args {
    /// TOML config file with [window] and [panel] tables
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Foreground image path
    #[arg(short, long)]
    pub foreground: Option<String>,

    /// Background image path or hex color (#rrggbb)
    #[arg(short, long)]
    pub background: Option<String>,

    /// Percent scratched that completes the card
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Brush diameter in pixels
    #[arg(short, long)]
    pub scratch_size: Option<f32>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Scratch Panel".to_string(), width: 480, height: 320 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub panel: PanelOptions,
}

impl DemoConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// File (if any) first, then command line overrides on top.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(args);
        Ok(config)
    }

    fn apply(&mut self, args: &Args) {
        if let Some(v) = &args.foreground {
            self.panel.foreground = v.clone();
        }
        if let Some(v) = &args.background {
            self.panel.background = v.clone();
        }
        if let Some(v) = args.threshold {
            self.panel.threshold = v;
        }
        if let Some(v) = args.scratch_size {
            self.panel.scratch_size = v;
        }
        if let Some(v) = args.width {
            self.window.width = v;
        }
        if let Some(v) = args.height {
            self.window.height = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.toml");
        std::fs::write(
            &path,
            "[window]\nwidth = 200\n\n[panel]\nforeground = \"a.png\"\nthreshold = 30\n",
        )
        .unwrap();

        let args = Args::parse_from([
            "scratch-panel",
            "--config",
            path.to_str().unwrap(),
            "--threshold",
            "80",
            "--background",
            "#102030",
        ]);
        let config = DemoConfig::load(&args).unwrap();

        assert_eq!(config.window.width, 200);
        assert_eq!(config.window.height, 320);
        assert_eq!(config.panel.foreground, "a.png");
        assert_eq!(config.panel.threshold, 80.0);
        assert_eq!(config.panel.background, "#102030");
        assert_eq!(config.panel.scratch_size, 40.0);
    }

    #[test]
    fn test_unknown_table_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[brush]\ncolor = \"red\"\n").unwrap();
        assert!(DemoConfig::from_file(&path).is_err());
    }
}
