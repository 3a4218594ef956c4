use clap::Parser;
use duo_bundler::ExecutionMode;

use super::*;

#[test]
fn test_parse_entry() {
    let entry = parse_entry("main=src/main.js").unwrap();
    assert_eq!(entry.name, "main");
    assert_eq!(entry.path.to_str(), Some("src/main.js"));

    let bare = parse_entry("src/admin.js").unwrap();
    assert_eq!(bare.name, "admin");

    assert!(parse_entry("").is_err());
    assert!(parse_entry("=src/a.js").is_err());
    assert!(parse_entry("main=").is_err());
}

#[test]
fn test_build_command() {
    let cli = Cli::try_parse_from([
        "duo", "build", "-e", "main=src/a.js", "--mode", "release", "--legacy-entry", "main",
    ])
    .unwrap();

    match cli.command {
        Command::Build(args) => {
            assert_eq!(args.project.entries.len(), 1);
            assert_eq!(args.project.mode, Some(ExecutionMode::Release));
            assert_eq!(args.project.legacy_entries, vec!["main".to_string()]);
        }
        Command::Watch(_) => panic!("expected build"),
    }
}

#[test]
fn test_watch_defaults() {
    let cli = Cli::try_parse_from(["duo", "watch", "-v"]).unwrap();
    assert!(cli.verbose);
    match cli.command {
        Command::Watch(args) => {
            assert_eq!(args.debounce, 200);
            assert!(args.project.mode.is_none());
        }
        Command::Build(_) => panic!("expected watch"),
    }
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    assert!(Cli::try_parse_from(["duo", "-v", "-q", "build"]).is_err());
    assert!(Cli::try_parse_from(["duo", "build", "--mode", "turbo"]).is_err());
}
