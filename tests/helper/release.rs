//! Release index fixtures

use release_updater::config::UpdaterConfig;
use serde_json::json;

// printf 'hello world' | openssl dgst -sha512 -binary | base64
pub const HELLO_WORLD_SHA512: &str =
    "MJ7MSJwS1utMxA9QyQLytNDtd+5RGnx6m808qG1M2G+YndNbxf9JlnDaNCVbRbDP2DDoH2Bdz33FVC6TrpzXbw==";

/// Config pointing at a mock host for `acme/desk`, x64 macOS zip installers
pub fn test_config(base_url: &str) -> UpdaterConfig {
    UpdaterConfig {
        base_url: base_url.to_string(),
        repository: "acme/desk".to_string(),
        product_name: "Desk".to_string(),
        arch: "x64".to_string(),
        platform: "mac".to_string(),
        extension: "zip".to_string(),
        ..Default::default()
    }
}

/// GitHub `releases/latest` body with the given `(name, url)` assets
pub fn release_json(tag: &str, assets: &[(&str, String)]) -> String {
    let assets: Vec<_> = assets
        .iter()
        .map(|(name, url)| {
            json!({
                "name": name,
                "browser_download_url": url,
                "size": 11,
            })
        })
        .collect();

    json!({
        "tag_name": tag,
        "name": format!("Desk {tag}"),
        "body": "Release notes",
        "assets": assets,
    })
    .to_string()
}
