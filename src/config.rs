use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use cross_xdg::BaseDirs;
use crate::tape::TAPE_CAPACITY;

/// Interpreter defaults that the command line can still override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tape_size: usize,
    pub timeout_ms: Option<u64>,
    pub max_steps: Option<usize>,
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tape_size: TAPE_CAPACITY,
            timeout_ms: None,
            max_steps: None,
            color: true,
        }
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Settings from the config file, then the environment, on top of the defaults.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        let mut settings = load_from_toml().unwrap_or_default();
        apply_env(&mut settings, |key| env::var(key).ok());
        settings
    })
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("BRAINGUCK_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("brainguck.toml");
    Some(path)
}

fn load_from_toml() -> Option<Settings> {
    let content = fs::read_to_string(config_path()?).ok()?;
    Some(parse_settings(&content))
}

/// Parse the `[interpreter]` section of a config file.
///
/// Very small hand-rolled parser: `key = value` lines, `#` comments, values
/// optionally quoted. Unknown keys and unparsable values are skipped.
pub fn parse_settings(content: &str) -> Settings {
    let mut cfg = Settings::default();
    let mut in_section = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = &line[1..line.len()-1] == "interpreter";
            continue;
        }
        if !in_section { continue; }
        let Some((key, raw)) = line.split_once('=') else { continue; };
        let raw = raw.trim();
        let value = if raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2 {
            &raw[1..raw.len()-1]
        } else { raw };
        apply(&mut cfg, key.trim(), value, "config file");
    }
    cfg
}

/// Apply `BRAINGUCK_*` environment overrides. `NO_COLOR` disables colour.
pub(crate) fn apply_env<F>(cfg: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (var, key) in [
        ("BRAINGUCK_TAPE_SIZE", "tape_size"),
        ("BRAINGUCK_TIMEOUT_MS", "timeout_ms"),
        ("BRAINGUCK_MAX_STEPS", "max_steps"),
    ] {
        if let Some(value) = lookup(var) {
            apply(cfg, key, value.trim(), var);
        }
    }
    if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        cfg.color = false;
    }
}

fn apply(cfg: &mut Settings, key: &str, value: &str, origin: &str) {
    let ok = match key {
        "tape_size" => match value.parse::<usize>() {
            Ok(n) if n > 0 => { cfg.tape_size = n; true }
            _ => false,
        },
        "timeout_ms" => value.parse::<u64>().map(|n| cfg.timeout_ms = Some(n)).is_ok(),
        "max_steps" => value.parse::<usize>().map(|n| cfg.max_steps = Some(n)).is_ok(),
        "color" => value.parse::<bool>().map(|b| cfg.color = b).is_ok(),
        _ => true,
    };
    if !ok {
        eprintln!("brainguck: ignoring invalid {key} = {value:?} from {origin}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_section_missing() {
        let cfg = parse_settings("[colors]\ntape_size = 10\n");
        assert_eq!(cfg, Settings::default());
    }

    #[test]
    fn reads_interpreter_section() {
        let cfg = parse_settings(
            "# brainguck\n[interpreter]\ntape_size = 512\ntimeout_ms = \"250\"\nmax_steps = 1000\ncolor = false\n",
        );
        assert_eq!(cfg.tape_size, 512);
        assert_eq!(cfg.timeout_ms, Some(250));
        assert_eq!(cfg.max_steps, Some(1000));
        assert!(!cfg.color);
    }

    #[test]
    fn rejects_zero_tape_and_garbage() {
        let cfg = parse_settings("[interpreter]\ntape_size = 0\nmax_steps = lots\n");
        assert_eq!(cfg.tape_size, TAPE_CAPACITY);
        assert_eq!(cfg.max_steps, None);
    }

    #[test]
    fn environment_overrides_file() {
        let mut cfg = parse_settings("[interpreter]\ntape_size = 512\n");
        let env: HashMap<&str, &str> = [("BRAINGUCK_TAPE_SIZE", "64"), ("NO_COLOR", "1")].into();
        apply_env(&mut cfg, |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.tape_size, 64);
        assert!(!cfg.color);
    }
}
