// build.rs
//
// Compiles `locales/*.toml` into a `t!` macro so every user-facing string is a
// `&'static str` literal and a missing key is a compile error.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

type Translations = BTreeMap<String, String>;

/// `lang_*` features win over `HUBCMD_LANG`; English is the default.
fn effective_language() -> String {
    let mut features: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    features.sort();

    if let Some(first) = features.first() {
        if features.len() > 1 {
            println!(
                "cargo:warning=Multiple language features enabled ({:?}). Using '{}'.",
                features, first
            );
        }
        return first.clone();
    }
    env::var("HUBCMD_LANG").unwrap_or_else(|_| "en".to_string())
}

fn load(path: &str) -> Option<Translations> {
    let content = fs::read_to_string(path).ok()?;
    Some(toml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e)))
}

fn main() {
    println!("cargo:rerun-if-env-changed=HUBCMD_LANG");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=locales/");

    let lang = effective_language();
    println!("cargo:rustc-env=HUBCMD_LANG_EFFECTIVE={}", lang);

    // English is the fallback for every key another language leaves out.
    let mut translations =
        load("locales/en.toml").expect("Failed to read fallback language file: locales/en.toml");
    if lang != "en" {
        let path = format!("locales/{}.toml", lang);
        match load(&path) {
            Some(specific) => {
                for key in specific.keys().filter(|k| !translations.contains_key(*k)) {
                    println!("cargo:warning={} defines unknown key '{}'", path, key);
                }
                translations.extend(specific);
            }
            None => println!(
                "cargo:warning=Language file '{}' not found. Falling back to 'en'.",
                path
            ),
        }
    }

    let mut macro_code = String::from("#[macro_export]\nmacro_rules! t {\n");
    for (key, value) in &translations {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        macro_code.push_str(&format!("    (\"{}\") => {{ \"{}\" }};\n", key, escaped));
    }
    macro_code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    macro_code.push('}');

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("translations.rs"), macro_code)
        .expect("Failed to write translations.rs");
}
