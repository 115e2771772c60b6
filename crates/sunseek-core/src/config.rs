use crate::app_config::{AppConfig, Environment, Viewport};
use crate::units::clamp_radius_miles;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// development config pointed at a local backend.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let env = parse_environment(&or_default("SUNSEEK_ENV", "development"))?;

    let api_base_url = or_default("SUNSEEK_API_BASE_URL", "http://127.0.0.1:5000");
    if api_base_url.trim().is_empty() {
        return Err(invalid("SUNSEEK_API_BASE_URL", "must not be empty".to_string()));
    }

    let log_level = or_default("SUNSEEK_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SUNSEEK_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SUNSEEK_USER_AGENT", "sunseek/0.1 (travel-weather)");
    let suggest_debounce_ms = parse_u64("SUNSEEK_SUGGEST_DEBOUNCE_MS", "300")?;
    let suggest_min_chars = parse_usize("SUNSEEK_SUGGEST_MIN_CHARS", "2")?;
    let default_radius_miles =
        clamp_radius_miles(parse_f64("SUNSEEK_DEFAULT_RADIUS_MILES", "50")?);
    let map_zoom = parse_f64("SUNSEEK_MAP_ZOOM", "7")?;
    if !(0.0..=22.0).contains(&map_zoom) {
        return Err(invalid("SUNSEEK_MAP_ZOOM", "must be between 0 and 22".to_string()));
    }
    let map_viewport = parse_viewport(&or_default("SUNSEEK_MAP_VIEWPORT", "1024x768"))
        .map_err(|reason| invalid("SUNSEEK_MAP_VIEWPORT", reason))?;
    let fixture_path = PathBuf::from(or_default(
        "SUNSEEK_FIXTURE_PATH",
        "./data/weather_data.json",
    ));

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        suggest_debounce_ms,
        suggest_min_chars,
        default_radius_miles,
        map_zoom,
        map_viewport,
        fixture_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SUNSEEK_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Parse a `WIDTHxHEIGHT` pixel size such as `1024x768`.
fn parse_viewport(raw: &str) -> Result<Viewport, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got \"{raw}\""))?;
    let width = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let height = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    if width == 0 || height == 0 {
        return Err("viewport dimensions must be non-zero".to_string());
    }
    Ok(Viewport {
        width: f64::from(width),
        height: f64::from(height),
    })
}
