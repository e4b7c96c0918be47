use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::editor::EditOptions;
use crate::markup::RenderOptions;
use crate::session::SessionOptions;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub pad_blocks: bool,
    pub no_store: bool,
    pub domain: Option<String>,
    pub store: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            pad_blocks: self.pad_blocks || other.pad_blocks,
            no_store: self.no_store || other.no_store,
            domain: other.domain.clone().or_else(|| self.domain.clone()),
            store: other.store.clone().or_else(|| self.store.clone()),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            render: self
                .domain
                .as_deref()
                .map_or_else(RenderOptions::default, |domain| {
                    RenderOptions::with_platform_domain(domain)
                }),
            edit: EditOptions {
                pad_blocks: self.pad_blocks,
            },
        }
    }

    /// Store file to use, or `None` when persistence is disabled.
    pub fn store_path(&self) -> Option<PathBuf> {
        if self.no_store {
            return None;
        }
        Some(self.store.clone().unwrap_or_else(default_store_path))
    }
}

pub fn global_config_path() -> PathBuf {
    platform_dir("APPDATA", &["Library", "Application Support"], "XDG_CONFIG_HOME", ".config")
        .map_or_else(|| PathBuf::from(".steamtextrc"), |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".steamtextrc")
}

pub fn default_store_path() -> PathBuf {
    platform_dir(
        "LOCALAPPDATA",
        &["Library", "Application Support"],
        "XDG_DATA_HOME",
        ".local/share",
    )
    .map_or_else(|| PathBuf::from(".steamtext-store.json"), |dir| dir.join("store.json"))
}

/// `steamtext` directory under the platform's config or data location.
#[allow(unused_variables)]
fn platform_dir(
    windows_var: &str,
    macos_parts: &[&str],
    xdg_var: &str,
    home_fallback: &str,
) -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os(windows_var) {
            return Some(PathBuf::from(appdata).join("steamtext"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.extend(macos_parts);
            return Some(dir.join("steamtext"));
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os(xdg_var) {
            return Some(PathBuf::from(xdg).join("steamtext"));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(home_fallback).join("steamtext"));
        }
    }

    None
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# steamtext defaults (saved with --save)".to_string());
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if flags.pad_blocks {
        lines.push("--pad-blocks".to_string());
    }
    if flags.no_store {
        lines.push("--no-store".to_string());
    }
    if let Some(domain) = &flags.domain {
        lines.push(format!("--domain {domain}"));
    }
    if let Some(store) = &flags.store {
        lines.push(format!("--store {}", store.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--watch" {
            flags.watch = true;
        } else if token == "--pad-blocks" {
            flags.pad_blocks = true;
        } else if token == "--no-store" {
            flags.no_store = true;
        } else if token == "--domain" {
            if let Some(next) = tokens.get(i + 1) {
                flags.domain = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--domain=") {
            flags.domain = Some(value.to_string());
        } else if token == "--store" {
            if let Some(next) = tokens.get(i + 1) {
                flags.store = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--store=") {
            flags.store = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "steamtext".to_string(),
            "render".to_string(),
            "--watch".to_string(),
            "--pad-blocks".to_string(),
            "--domain".to_string(),
            "valve".to_string(),
            "--store=state.json".to_string(),
            "notes.txt".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.watch);
        assert!(flags.pad_blocks);
        assert!(!flags.no_store);
        assert_eq!(flags.domain.as_deref(), Some("valve"));
        assert_eq!(flags.store, Some(PathBuf::from("state.json")));
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            watch: true,
            domain: Some("steam".to_string()),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            pad_blocks: true,
            domain: Some("valve".to_string()),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.watch);
        assert!(merged.pad_blocks);
        assert_eq!(merged.domain.as_deref(), Some("valve"));
    }

    #[test]
    fn test_session_options_follow_flags() {
        let flags = ConfigFlags {
            pad_blocks: true,
            domain: Some("valve".to_string()),
            ..ConfigFlags::default()
        };
        let options = flags.session_options();
        assert!(options.edit.pad_blocks);
        assert_eq!(options.render.platform_domain, "valve");
        assert_eq!(
            ConfigFlags::default().session_options().render,
            RenderOptions::default()
        );
    }

    #[test]
    fn test_store_path_honours_no_store_and_override() {
        let disabled = ConfigFlags {
            no_store: true,
            store: Some(PathBuf::from("x.json")),
            ..ConfigFlags::default()
        };
        assert_eq!(disabled.store_path(), None);

        let custom = ConfigFlags {
            store: Some(PathBuf::from("x.json")),
            ..ConfigFlags::default()
        };
        assert_eq!(custom.store_path(), Some(PathBuf::from("x.json")));
        assert!(ConfigFlags::default().store_path().is_some());
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".steamtextrc");
        let flags = ConfigFlags {
            watch: true,
            pad_blocks: true,
            no_store: true,
            domain: Some("valve".to_string()),
            store: Some(PathBuf::from("state.json")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}
