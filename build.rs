use std::collections::HashMap;

fn main() {
    // Re-run build script when this file or any launcher input changes
    println!("cargo:rerun-if-changed=build.rs");
    for key in [
        "BUNDLE_LAUNCHER_CONFIG_FILE",
        "BUNDLE_LAUNCHER_COMMAND",
        "BUNDLE_LAUNCHER_PYTHON",
        "BUNDLE_LAUNCHER_STRATEGY",
    ] {
        println!("cargo:rerun-if-env-changed={key}");
    }

    // Launcher tokens are baked in by the packaging tool.
    // Priority (each key):
    //   1) BUNDLE_LAUNCHER_CONFIG_FILE: `key = value` lines (command, python, strategy)
    //   2) BUNDLE_LAUNCHER_COMMAND / BUNDLE_LAUNCHER_PYTHON / BUNDLE_LAUNCHER_STRATEGY
    let mut file_values: HashMap<String, String> = HashMap::new();
    if let Ok(path) = std::env::var("BUNDLE_LAUNCHER_CONFIG_FILE") {
        println!("cargo:rerun-if-changed={path}");
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines().map(|l| l.trim()) {
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        file_values.insert(k.trim().to_ascii_lowercase(), v.trim().to_string());
                    }
                }
            }
            Err(e) => {
                println!("cargo:warning=cannot read launcher config file {path}: {e}");
            }
        }
    }

    let lookup = |file_key: &str, env_key: &str| -> Option<String> {
        file_values
            .get(file_key)
            .cloned()
            .or_else(|| std::env::var(env_key).ok())
            .map(|v| v.trim().to_string())
    };

    // The command token is embedded verbatim, newlines would split the generated line.
    let command = lookup("command", "BUNDLE_LAUNCHER_COMMAND").unwrap_or_default();
    if command.contains('\n') || command.contains('\r') {
        panic!("launcher command token must be a single line");
    }
    println!("cargo:rustc-env=BUNDLE_LAUNCHER_COMMAND={command}");

    let python = lookup("python", "BUNDLE_LAUNCHER_PYTHON").unwrap_or_default();
    println!("cargo:rustc-env=BUNDLE_LAUNCHER_PYTHON={python}");

    let strategy = lookup("strategy", "BUNDLE_LAUNCHER_STRATEGY")
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    let strategy = match strategy.as_str() {
        "" | "direct" => "direct",
        "shell" => "shell",
        other => {
            println!("cargo:warning=unknown launch strategy '{other}', using direct");
            "direct"
        }
    };
    println!("cargo:rustc-env=BUNDLE_LAUNCHER_STRATEGY={strategy}");

    // Build date (UTC ISO-8601). Fallback to unix:<secs> if formatting fails.
    let now = time::OffsetDateTime::now_utc();
    let build_date = now
        .format(time::macros::format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
        ))
        .unwrap_or_else(|_| format!("unix:{}", now.unix_timestamp()));
    println!("cargo:rustc-env=BUNDLE_LAUNCHER_BUILD_DATE={build_date}");

    // Target triple and profile
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=BUNDLE_LAUNCHER_BUILD_TARGET={target}");

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=BUNDLE_LAUNCHER_BUILD_PROFILE={profile}");

    // rustc version (best-effort)
    let rustc_ver = rustc_version::version()
        .map(|v| v.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=BUNDLE_LAUNCHER_BUILD_RUSTC={rustc_ver}");
}
