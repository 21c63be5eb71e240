use env_logger::Env;

const CRATES: [&str; 2] = ["cp2k_deepmd", "c2dp"];

/// Log coverage reports are shown without `-v`.
const COVERAGE_MODULE: &str = "cp2k_deepmd::io::series";

fn level_name(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn default_filter(verbosity: u8) -> String {
    let level = level_name(verbosity);
    let mut directives: Vec<String> = CRATES
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect();
    if verbosity == 0 {
        directives.push(format!("{COVERAGE_MODULE}=info"));
    }
    directives.join(",")
}

/// Installs the global logger. `RUST_LOG`, when set, replaces the level
/// derived from `-v`.
pub fn init(verbosity: u8) {
    let filter = default_filter(verbosity);
    env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level_for_both_crates() {
        assert_eq!(
            default_filter(0),
            "cp2k_deepmd=warn,c2dp=warn,cp2k_deepmd::io::series=info"
        );
        assert_eq!(default_filter(1), "cp2k_deepmd=info,c2dp=info");
        assert_eq!(level_name(9), "trace");
    }

    #[test]
    fn coverage_report_is_visible_at_default_level() {
        let filter = env_logger::filter::Builder::new()
            .parse(&default_filter(0))
            .build();
        let matched = log::Record::builder()
            .level(log::Level::Info)
            .module_path(Some("cp2k_deepmd::io::series::reader"))
            .target("cp2k_deepmd::io::series::reader")
            .build();
        assert!(filter.matches(&matched));

        let other = log::Record::builder()
            .level(log::Level::Info)
            .target("cp2k_deepmd::dataset::assemble")
            .build();
        assert!(!filter.matches(&other));
    }
}
