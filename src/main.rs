// SPDX-License-Identifier: MPL-2.0
use arthasetu_i18n::config;
use arthasetu_i18n::i18n::{
    BackgroundStore, Catalog, I18n, SelectionStore, SettingsStore, StartupOptions,
};
use arthasetu_i18n::paths;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
arthasetu-i18n: inspect Arthasetu translations and the saved language

USAGE:
  arthasetu-i18n [OPTIONS] [KEY...]

OPTIONS:
  --lang CODE        Resolve with CODE for this run only (en, hi, kn, tu)
  --set CODE         Switch to CODE and save it as the active language
  --config-dir DIR   Read and write settings.toml in DIR
  --list             List available languages, marking the active one
  --check            Report keys missing from any language (exit 1 on gaps)
  -h, --help         Print this help
";

struct Args {
    help: bool,
    lang: Option<String>,
    set: Option<String>,
    config_dir: Option<String>,
    list: bool,
    check: bool,
    keys: Vec<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = pico_args::Arguments::from_env();

    let parsed = Args {
        help: args.contains(["-h", "--help"]),
        lang: args.opt_value_from_str("--lang").map_err(|e| e.to_string())?,
        set: args.opt_value_from_str("--set").map_err(|e| e.to_string())?,
        config_dir: args
            .opt_value_from_str("--config-dir")
            .map_err(|e| e.to_string())?,
        list: args.contains("--list"),
        check: args.contains("--check"),
        keys: Vec::new(),
    };

    let mut keys = Vec::new();
    for raw in args.finish() {
        let key = raw
            .into_string()
            .map_err(|raw| format!("key is not valid UTF-8: {raw:?}"))?;
        if key.starts_with('-') {
            return Err(format!("unknown option: {key}"));
        }
        keys.push(key);
    }

    Ok(Args { keys, ..parsed })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };
    if args.help {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    paths::init_cli_overrides(args.config_dir);

    let (cfg, warning) = config::load();
    if let Some(warning) = warning {
        tracing::warn!(%warning, "using default settings");
    }
    let options = StartupOptions::from_config(&cfg, args.lang);

    let store: Box<dyn SelectionStore> = match BackgroundStore::new(SettingsStore::new()) {
        Ok(store) => Box::new(store),
        Err(err) => {
            tracing::warn!(error = %err, "saving language on the calling thread");
            Box::new(SettingsStore::new())
        }
    };
    let mut i18n = I18n::new(Catalog::embedded(), store, &options);

    if let Some(code) = args.set.as_deref() {
        if !i18n.set_active_code(code) {
            eprintln!("error: unsupported language {code:?}");
            return ExitCode::from(2);
        }
        let active = i18n.active_locale();
        println!("active: {} ({})", active, active.native_name());
    }

    if args.list {
        for locale in i18n.available_locales() {
            let marker = if *locale == i18n.active_locale() { '*' } else { ' ' };
            println!("{marker} {locale}  {}", locale.native_name());
        }
    }

    for key in &args.keys {
        println!("{key} = {}", i18n.resolve(key));
    }

    if args.check {
        let report = i18n.coverage();
        print!("{report}");
        if !report.is_complete() {
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
