//! Host services implemented with JavaScript callbacks.
//!
//! Each callback returns a `Promise`; the bridge awaits it and converts the
//! settled value into the editor's types.

use crate::error::BridgeError;
use async_trait::async_trait;
use js_sys::{Function, Promise, Uint8Array};
use sb_core::id::Clock;
use sb_editor::{
    ImageEdit, ImageEditRequest, RasterJob, Rasterizer, SuggestError, SuggestionService, TextRequest,
    TextSuggestion,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// `Date.now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Call `f(args...)` and await the promise (or plain value) it returns.
async fn call_async(f: &Function, args: &[JsValue]) -> Result<JsValue, BridgeError> {
    let array: js_sys::Array = args.iter().collect();
    let returned = f
        .apply(&JsValue::NULL, &array)
        .map_err(|e| BridgeError::from_js(&e))?;
    let promise = match returned.dyn_into::<Promise>() {
        Ok(promise) => promise,
        Err(value) => Promise::resolve(&value),
    };
    JsFuture::from(promise)
        .await
        .map_err(|e| BridgeError::from_js(&e))
}

/// `rasterize(markup, width, height, pixelRatio) -> Promise<Uint8Array>`.
pub struct JsRasterizer {
    rasterize: Function,
}

impl JsRasterizer {
    pub fn new(rasterize: Function) -> Self {
        Self { rasterize }
    }
}

#[async_trait(?Send)]
impl Rasterizer for JsRasterizer {
    async fn rasterize(&self, job: &RasterJob) -> Result<Vec<u8>, String> {
        let args = [
            JsValue::from_str(&job.markup),
            JsValue::from(job.width),
            JsValue::from(job.height),
            JsValue::from(job.pixel_ratio),
        ];
        let value = call_async(&self.rasterize, &args)
            .await
            .map_err(|e| e.to_string())?;
        value
            .dyn_into::<Uint8Array>()
            .map(|bytes| bytes.to_vec())
            .map_err(|_| "the rasterizer did not return bytes".to_owned())
    }
}

/// Text and image suggestions through two callbacks taking and returning
/// JSON strings:
///
/// * `suggestText('{"prompt":..,"nodeType":..}') -> Promise<'{"title":..,"description":..}'>`
/// * `modifyImage('{"imageData":..,"instruction":..}') -> Promise<'{"modifiedImageData":..}'>`
pub struct JsSuggestionService {
    suggest_text: Option<Function>,
    modify_image: Option<Function>,
}

impl JsSuggestionService {
    pub fn text(suggest_text: Function) -> Self {
        Self {
            suggest_text: Some(suggest_text),
            modify_image: None,
        }
    }

    pub fn image(modify_image: Function) -> Self {
        Self {
            suggest_text: None,
            modify_image: Some(modify_image),
        }
    }

    async fn call_json(f: Option<&Function>, request: String) -> Result<String, SuggestError> {
        let f = f.ok_or_else(|| SuggestError::Transport("no service configured".into()))?;
        let value = call_async(f, &[JsValue::from_str(&request)])
            .await
            .map_err(|e| SuggestError::Transport(e.to_string()))?;
        value
            .as_string()
            .ok_or_else(|| SuggestError::Malformed("response is not a string".into()))
    }
}

#[async_trait(?Send)]
impl SuggestionService for JsSuggestionService {
    async fn suggest_text(&self, request: &TextRequest) -> Result<TextSuggestion, SuggestError> {
        let body = serde_json::to_string(request).map_err(|e| SuggestError::Malformed(e.to_string()))?;
        let response = Self::call_json(self.suggest_text.as_ref(), body).await?;
        TextSuggestion::from_json(&response)
    }

    async fn modify_image(&self, request: &ImageEditRequest) -> Result<ImageEdit, SuggestError> {
        let body = serde_json::to_string(request).map_err(|e| SuggestError::Malformed(e.to_string()))?;
        let response = Self::call_json(self.modify_image.as_ref(), body).await?;
        ImageEdit::from_json(&response)
    }
}

/// Offer `parts` to the user as a file download.
pub fn trigger_download(filename: &str, parts: &js_sys::Array, mime: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)
}
