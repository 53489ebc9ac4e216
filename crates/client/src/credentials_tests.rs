use super::*;
use std::io::Write as _;

#[test]
fn parses_ini_style_file() {
    let content = "[default]\nAPI_KEY = abc-123\n";
    assert_eq!(parse_credentials_file(content).as_deref(), Some("abc-123"));
}

#[test]
fn parser_skips_comments_sections_and_blanks() {
    let content = "\
# credentials for the hosted API
[default]

OTHER = ignored
API_KEY=tight-spacing
";
    assert_eq!(
        parse_credentials_file(content).as_deref(),
        Some("tight-spacing")
    );
}

#[test]
fn parser_rejects_files_without_a_key() {
    assert!(parse_credentials_file("").is_none());
    assert!(parse_credentials_file("[default]\n").is_none());
    assert!(parse_credentials_file("API_KEY =\n").is_none());
    assert!(parse_credentials_file("api_key = lowercase-name\n").is_none());
}

#[test]
fn static_credential_returns_its_key() {
    let provider = StaticCredential("fixed".to_string());
    assert_eq!(provider.api_key().unwrap(), "fixed");
}

/// The full chain in one test: env mutation cannot run concurrently with
/// itself, so every ordering assertion lives here.
#[test]
fn default_chain_checks_file_then_environment() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-file");

    // neither file nor env: Missing
    env::set_var(CREDENTIALS_PATH_ENV, &missing);
    env::remove_var(API_KEY_ENV);
    let err = DefaultCredentialProvider::new().api_key().unwrap_err();
    assert!(matches!(err, CredentialError::Missing));

    // env only
    env::set_var(API_KEY_ENV, "from-env");
    assert_eq!(
        DefaultCredentialProvider::new().api_key().unwrap(),
        "from-env"
    );

    // file wins over env
    let path = dir.path().join("credentials");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "[default]").unwrap();
    writeln!(file, "API_KEY = from-file").unwrap();
    env::set_var(CREDENTIALS_PATH_ENV, &path);
    assert_eq!(
        DefaultCredentialProvider::new().api_key().unwrap(),
        "from-file"
    );

    // a file without a usable key falls through to the env
    fs::write(&path, "[default]\n").unwrap();
    assert_eq!(
        DefaultCredentialProvider::new().api_key().unwrap(),
        "from-env"
    );

    env::remove_var(CREDENTIALS_PATH_ENV);
    env::remove_var(API_KEY_ENV);
}
