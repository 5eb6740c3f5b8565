use super::*;

#[test]
fn missing_value_uses_default() {
    assert_eq!(ApiConfig::from_raw(None).base_url, DEFAULT_API_BASE_URL);
    assert_eq!(ApiConfig::default().base_url, "/api");
}

#[test]
fn blank_value_uses_default() {
    assert_eq!(ApiConfig::from_raw(Some("   ")).base_url, DEFAULT_API_BASE_URL);
    assert_eq!(ApiConfig::from_raw(Some("/")).base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn trailing_slashes_are_trimmed() {
    assert_eq!(
        ApiConfig::from_raw(Some(" https://credits.example.edu/api/ ")).base_url,
        "https://credits.example.edu/api"
    );
}
