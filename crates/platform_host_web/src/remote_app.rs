//! `fetch`-backed remote app metadata and catalog service.

use platform_host::{
    manifest_url_for, RemoteAppEntry, RemoteAppFuture, RemoteAppMetadata, RemoteAppService,
};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
/// Subset of a web app manifest relevant to window presentation.
pub struct WebAppManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    icons: Vec<WebAppManifestIcon>,
}

#[derive(Debug, Clone, Deserialize)]
struct WebAppManifestIcon {
    src: String,
}

/// Converts a fetched manifest into window metadata, resolving relative icon paths against
/// `app_url`.
pub fn metadata_from_manifest(manifest: WebAppManifest, app_url: &str) -> RemoteAppMetadata {
    let name = manifest
        .short_name
        .or(manifest.name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    let icon = manifest.icons.into_iter().next().map(|icon| {
        if icon.src.starts_with("http://")
            || icon.src.starts_with("https://")
            || icon.src.starts_with("data:")
        {
            icon.src
        } else {
            let base = app_url.split(['?', '#']).next().unwrap_or(app_url);
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                icon.src.trim_start_matches("./").trim_start_matches('/')
            )
        }
    });
    RemoteAppMetadata { name, icon }
}

#[derive(Debug, Clone, Copy, Default)]
/// Browser remote app service using `window.fetch`.
pub struct WebRemoteAppService;

impl RemoteAppService for WebRemoteAppService {
    fn fetch_metadata<'a>(
        &'a self,
        url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Option<RemoteAppMetadata>, String>> {
        Box::pin(async move {
            let Some(manifest) = imp::fetch_json::<WebAppManifest>(&manifest_url_for(url)).await?
            else {
                return Ok(None);
            };
            Ok(Some(metadata_from_manifest(manifest, url)))
        })
    }

    fn fetch_catalog<'a>(
        &'a self,
        catalog_url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Vec<RemoteAppEntry>, String>> {
        Box::pin(async move {
            Ok(imp::fetch_json::<Vec<RemoteAppEntry>>(catalog_url)
                .await?
                .unwrap_or_default())
        })
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use serde::de::DeserializeOwned;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    fn js_error_to_string(err: JsValue) -> String {
        if let Some(text) = err.as_string() {
            return text;
        }
        if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
            if let Some(text) = message.as_string() {
                return text;
            }
        }
        format!("{err:?}")
    }

    pub(super) async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<Option<T>, String> {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_error_to_string)?
            .dyn_into::<web_sys::Response>()
            .map_err(|_| format!("fetch `{url}` did not produce a response"))?;
        if response.status() == 404 {
            return Ok(None);
        }
        if !response.ok() {
            return Err(format!("fetch `{url}` failed with status {}", response.status()));
        }
        let json = JsFuture::from(response.json().map_err(js_error_to_string)?)
            .await
            .map_err(js_error_to_string)?;
        serde_wasm_bindgen::from_value(json)
            .map(Some)
            .map_err(|e| e.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use serde::de::DeserializeOwned;

    pub(super) async fn fetch_json<T: DeserializeOwned>(_url: &str) -> Result<Option<T>, String> {
        Ok(None)
    }
}
