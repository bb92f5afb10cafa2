//! C FFI surface for qrpulse.
//!
//! Pattern: stateless format calls + opaque StudioHandle + C strings +
//! JSON serialization. Field bags cross the boundary as JSON objects of
//! strings; records use the history JSON layout.
//!
//! Flutter/Dart calls these via `dart:ffi`. Any platform with C FFI
//! (Swift, Kotlin, Python, Node.js) can use this.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::sync::Arc;

use qrpulse_core::effects::{FileHistory, HistoryStore};
use qrpulse_core::models::record::{new_record_id, now_ms};
use qrpulse_core::{
    classify, detect, encode_bag, paths, FieldBag, HistoryRecord, Intent, RenderOptions, Studio,
};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Error handling (thread-local last error)
// ---------------------------------------------------------------------------

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn set_error(msg: String) {
    LAST_ERROR.with(|cell| *cell.borrow_mut() = Some(msg));
}

fn clear_error() {
    LAST_ERROR.with(|cell| *cell.borrow_mut() = None);
}

/// Returns the last error message (caller frees with `qrpulse_string_free`).
#[no_mangle]
pub extern "C" fn qrpulse_last_error() -> *mut c_char {
    LAST_ERROR.with(|cell| {
        cell.borrow_mut()
            .take()
            .and_then(|s| CString::new(s).ok())
            .map(|s| s.into_raw())
            .unwrap_or(ptr::null_mut())
    })
}

/// Frees a string returned from qrpulse FFI.
///
/// # Safety
/// Must be a pointer returned from this FFI and not already freed.
#[no_mangle]
pub unsafe extern "C" fn qrpulse_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        let _ = CString::from_raw(ptr);
    }
}

// ---------------------------------------------------------------------------
// Format model (stateless)
// ---------------------------------------------------------------------------

/// Encode a field bag. `intent` is a tag like `"wifi"`, `bag_json` a JSON
/// object of strings. Returns the payload (caller frees), or NULL on error.
#[no_mangle]
pub extern "C" fn qrpulse_encode(intent: *const c_char, bag_json: *const c_char) -> *mut c_char {
    clear_error();
    let intent = match read_intent(intent) {
        Ok(i) => i,
        Err(e) => return err_null(e),
    };
    let bag = match read_json::<FieldBag>(bag_json) {
        Ok(b) => b,
        Err(e) => return err_null(e),
    };
    to_cstr(encode_bag(intent, &bag))
}

/// Classify a payload. Returns the intent tag (caller frees).
#[no_mangle]
pub extern "C" fn qrpulse_classify(payload: *const c_char) -> *mut c_char {
    clear_error();
    match read_cstr(payload) {
        Ok(p) => to_cstr(classify(&p).as_str().to_string()),
        Err(e) => err_null(e),
    }
}

/// Parse a payload as `intent` (NULL = classify first). Returns the field
/// bag JSON (caller frees).
#[no_mangle]
pub extern "C" fn qrpulse_parse(payload: *const c_char, intent: *const c_char) -> *mut c_char {
    clear_error();
    let payload = match read_cstr(payload) {
        Ok(p) => p,
        Err(e) => return err_null(e),
    };
    let intent = if intent.is_null() {
        classify(&payload)
    } else {
        match read_intent(intent) {
            Ok(i) => i,
            Err(e) => return err_null(e),
        }
    };
    json_to_cstr(&qrpulse_core::parse(&payload, intent).to_bag())
}

/// Classify + parse. Returns `{"type": <intent>, "fields": {...}}` (caller frees).
#[no_mangle]
pub extern "C" fn qrpulse_detect(payload: *const c_char) -> *mut c_char {
    clear_error();
    let payload = match read_cstr(payload) {
        Ok(p) => p,
        Err(e) => return err_null(e),
    };
    let fields = detect(&payload);
    json_to_cstr(&serde_json::json!({
        "type": fields.intent(),
        "fields": fields.to_bag(),
    }))
}

// ---------------------------------------------------------------------------
// Opaque handle
// ---------------------------------------------------------------------------

#[repr(C)]
pub struct StudioHandle {
    _private: [u8; 0],
}

struct StudioHandleInner {
    studio: Studio,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Sets the qrpulse storage root directory.
///
/// # Safety
/// `path` must be a valid null-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn qrpulse_set_root(path: *const c_char) -> i32 {
    clear_error();
    match read_cstr(path) {
        Ok(p) => {
            std::env::set_var(paths::ROOT_ENV, p);
            1
        }
        Err(e) => {
            set_error(e);
            0
        }
    }
}

/// Opens a studio over the file history under the storage root.
/// Images are rendered by the host; records store the data URL it supplies.
#[no_mangle]
pub extern "C" fn qrpulse_open() -> *mut StudioHandle {
    clear_error();
    let history = Arc::new(FileHistory::open(paths::history_path()));
    let studio = Studio::headless(history);
    Box::into_raw(Box::new(StudioHandleInner { studio })) as *mut StudioHandle
}

/// Closes the studio and releases all resources.
#[no_mangle]
pub extern "C" fn qrpulse_close(handle: *mut StudioHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle as *mut StudioHandleInner));
        }
    }
}

// ---------------------------------------------------------------------------
// Render options
// ---------------------------------------------------------------------------

/// Current render options JSON (caller frees).
#[no_mangle]
pub extern "C" fn qrpulse_options(handle: *mut StudioHandle) -> *mut c_char {
    clear_error();
    match studio_ref(handle) {
        Ok(s) => json_to_cstr(&s.options()),
        Err(e) => err_null(e),
    }
}

/// Replace the render options. Missing keys take their defaults.
/// Returns 1 on success, 0 on error.
#[no_mangle]
pub extern "C" fn qrpulse_set_options(handle: *mut StudioHandle, json: *const c_char) -> i32 {
    clear_error();
    let studio = match studio_ref(handle) {
        Ok(s) => s,
        Err(e) => return err_zero(e),
    };
    match read_json::<RenderOptions>(json) {
        Ok(options) => {
            studio.set_options(options);
            1
        }
        Err(e) => err_zero(e),
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// What a host sends after rendering a code itself.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendRequest {
    content: String,
    #[serde(rename = "type")]
    intent: Option<Intent>,
    #[serde(default)]
    options: Option<RenderOptions>,
    #[serde(default)]
    data_url: String,
}

/// Record a host-rendered code. `json` is
/// `{"content": ..., "type"?: ..., "options"?: {...}, "dataUrl"?: ...}`;
/// a missing type is classified, fields are parsed from the content.
/// Returns the stored record JSON (caller frees).
#[no_mangle]
pub extern "C" fn qrpulse_history_append(
    handle: *mut StudioHandle,
    json: *const c_char,
) -> *mut c_char {
    clear_error();
    let studio = match studio_ref(handle) {
        Ok(s) => s,
        Err(e) => return err_null(e),
    };
    let req = match read_json::<AppendRequest>(json) {
        Ok(r) => r,
        Err(e) => return err_null(e),
    };
    if req.content.trim().is_empty() {
        return err_null(qrpulse_core::Error::InputRequired.to_string());
    }
    let intent = req.intent.unwrap_or_else(|| classify(&req.content));
    let record = HistoryRecord {
        id: new_record_id(),
        intent,
        fields: qrpulse_core::parse(&req.content, intent).to_bag(),
        content: req.content,
        options: req.options.unwrap_or_else(|| studio.options()),
        data_url: req.data_url,
        timestamp: now_ms(),
    };
    match studio.history_store().append(record.clone()) {
        Ok(()) => json_to_cstr(&record),
        Err(e) => err_null(e.to_string()),
    }
}

/// Encode `bag_json` as `intent` and record it (headless image).
/// Returns the record JSON (caller frees).
#[no_mangle]
pub extern "C" fn qrpulse_generate(
    handle: *mut StudioHandle,
    intent: *const c_char,
    bag_json: *const c_char,
) -> *mut c_char {
    clear_error();
    let studio = match studio_ref(handle) {
        Ok(s) => s,
        Err(e) => return err_null(e),
    };
    let intent = match read_intent(intent) {
        Ok(i) => i,
        Err(e) => return err_null(e),
    };
    let bag = match read_json::<FieldBag>(bag_json) {
        Ok(b) => b,
        Err(e) => return err_null(e),
    };
    match studio.generate(&qrpulse_core::Fields::from_bag(intent, &bag)) {
        Ok(record) => json_to_cstr(&record),
        Err(e) => err_null(e.to_string()),
    }
}

/// Classify, parse and record a decoded payload. Returns the record JSON
/// (caller frees).
#[no_mangle]
pub extern "C" fn qrpulse_scan_payload(
    handle: *mut StudioHandle,
    payload: *const c_char,
) -> *mut c_char {
    clear_error();
    let studio = match studio_ref(handle) {
        Ok(s) => s,
        Err(e) => return err_null(e),
    };
    let payload = match read_cstr(payload) {
        Ok(p) => p,
        Err(e) => return err_null(e),
    };
    match studio.scan_payload(&payload) {
        Ok(record) => json_to_cstr(&record),
        Err(e) => err_null(e.to_string()),
    }
}

/// History records, most recent first. Returns JSON array (caller frees).
#[no_mangle]
pub extern "C" fn qrpulse_history_list(handle: *mut StudioHandle) -> *mut c_char {
    clear_error();
    match studio_ref(handle) {
        Ok(s) => json_to_cstr(&s.history()),
        Err(e) => err_null(e),
    }
}

/// Re-open a record: `{"record": {...}, "fields": {...}}` (caller frees),
/// or NULL if the id is unknown.
#[no_mangle]
pub extern "C" fn qrpulse_select(handle: *mut StudioHandle, id: *const c_char) -> *mut c_char {
    clear_error();
    let studio = match studio_ref(handle) {
        Ok(s) => s,
        Err(e) => return err_null(e),
    };
    let id = match read_cstr(id) {
        Ok(s) => s,
        Err(e) => return err_null(e),
    };
    match studio.select(&id) {
        Ok(sel) => json_to_cstr(&serde_json::json!({
            "record": sel.record,
            "fields": sel.fields.to_bag(),
        })),
        Err(e) => err_null(e.to_string()),
    }
}

/// Remove a record. Returns 1 on success, 0 on error (unknown id included).
#[no_mangle]
pub extern "C" fn qrpulse_history_remove(handle: *mut StudioHandle, id: *const c_char) -> i32 {
    clear_error();
    let studio = match studio_ref(handle) {
        Ok(s) => s,
        Err(e) => return err_zero(e),
    };
    let id = match read_cstr(id) {
        Ok(s) => s,
        Err(e) => return err_zero(e),
    };
    match studio.remove(&id) {
        Ok(()) => 1,
        Err(e) => err_zero(e.to_string()),
    }
}

/// Delete all history. Returns 1 on success, 0 on error.
#[no_mangle]
pub extern "C" fn qrpulse_history_clear(handle: *mut StudioHandle) -> i32 {
    clear_error();
    let studio = match studio_ref(handle) {
        Ok(s) => s,
        Err(e) => return err_zero(e),
    };
    match studio.clear_history() {
        Ok(()) => 1,
        Err(e) => err_zero(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// ABI version; bumped on breaking signature changes.
#[no_mangle]
pub extern "C" fn qrpulse_version() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn studio_ref<'a>(handle: *mut StudioHandle) -> Result<&'a Studio, String> {
    if handle.is_null() {
        return Err("null studio handle".into());
    }
    let inner = unsafe { &*(handle as *mut StudioHandleInner) };
    Ok(&inner.studio)
}

fn read_cstr(ptr: *const c_char) -> Result<String, String> {
    if ptr.is_null() {
        return Err("null string pointer".into());
    }
    unsafe {
        CStr::from_ptr(ptr)
            .to_str()
            .map(String::from)
            .map_err(|_| "invalid utf-8".into())
    }
}

fn read_intent(ptr: *const c_char) -> Result<Intent, String> {
    read_cstr(ptr)?.parse::<Intent>().map_err(|e| e.to_string())
}

fn read_json<T: serde::de::DeserializeOwned>(ptr: *const c_char) -> Result<T, String> {
    serde_json::from_str(&read_cstr(ptr)?).map_err(|e| e.to_string())
}

fn json_to_cstr<T: serde::Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => to_cstr(json),
        Err(e) => err_null(e.to_string()),
    }
}

fn to_cstr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c) => c.into_raw(),
        Err(e) => err_null(format!("string has interior NUL at byte {}", e.nul_position())),
    }
}

fn err_null(msg: String) -> *mut c_char {
    set_error(msg);
    ptr::null_mut()
}

fn err_zero(msg: String) -> i32 {
    set_error(msg);
    0
}

// ---------------------------------------------------------------------------
// FFI Integration Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    /// Open a studio via FFI in a temp directory. Returns (dir, handle, guard).
    fn ffi_studio() -> (TempDir, *mut StudioHandle, std::sync::MutexGuard<'static, ()>) {
        let guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let dir = TempDir::new().expect("tempdir");
        let root = CString::new(dir.path().to_str().unwrap()).unwrap();
        unsafe {
            qrpulse_set_root(root.as_ptr());
        }
        let handle = qrpulse_open();
        assert!(!handle.is_null(), "qrpulse_open returned null");
        (dir, handle, guard)
    }

    /// Read a *mut c_char into a String and free it.
    fn read_ffi_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null(), "FFI returned null string");
        let s = unsafe { CStr::from_ptr(ptr).to_str().unwrap().to_string() };
        unsafe { qrpulse_string_free(ptr) };
        s
    }

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    // -------------------------------------------------------------------
    // Format model
    // -------------------------------------------------------------------

    #[test]
    fn ffi_version() {
        assert_eq!(qrpulse_version(), 1);
    }

    #[test]
    fn ffi_encode_classify_parse() {
        let intent = c("email");
        let bag = c(r#"{"email":"a@b.com","subject":"Hi there"}"#);
        let payload = read_ffi_string(qrpulse_encode(intent.as_ptr(), bag.as_ptr()));
        assert_eq!(payload, "mailto:a@b.com?subject=Hi%20there");

        let p = c(&payload);
        assert_eq!(read_ffi_string(qrpulse_classify(p.as_ptr())), "email");

        let parsed = read_ffi_string(qrpulse_parse(p.as_ptr(), ptr::null()));
        let fields: serde_json::Value = serde_json::from_str(&parsed).unwrap();
        assert_eq!(fields["subject"], "Hi there");
        assert_eq!(fields["body"], "");
    }

    #[test]
    fn ffi_detect_payment() {
        let p = c("https://www.paypal.com/paypalme/alice/10");
        let json = read_ffi_string(qrpulse_detect(p.as_ptr()));
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["type"], "payment");
        assert_eq!(v["fields"]["recipient"], "alice");
    }

    #[test]
    fn ffi_unknown_intent_sets_error() {
        let intent = c("hologram");
        let bag = c("{}");
        let ptr = qrpulse_encode(intent.as_ptr(), bag.as_ptr());
        assert!(ptr.is_null());
        let msg = read_ffi_string(qrpulse_last_error());
        assert!(msg.contains("hologram"));
    }

    #[test]
    fn ffi_interior_nul_sets_error() {
        let intent = c("text");
        let bag = c(r#"{"text":"a\u0000b"}"#);
        let ptr = qrpulse_encode(intent.as_ptr(), bag.as_ptr());
        assert!(ptr.is_null());
        let msg = read_ffi_string(qrpulse_last_error());
        assert!(msg.contains("interior NUL"));
    }

    #[test]
    fn ffi_null_handle_returns_error() {
        let ptr = qrpulse_history_list(ptr::null_mut());
        assert!(ptr.is_null());
        let err = qrpulse_last_error();
        if !err.is_null() {
            let msg = read_ffi_string(err);
            assert!(msg.contains("null"));
        }
    }

    // -------------------------------------------------------------------
    // Studio via FFI
    // -------------------------------------------------------------------

    #[test]
    fn ffi_open_close_lifecycle() {
        let (_dir, handle, _guard) = ffi_studio();
        qrpulse_close(handle);
    }

    #[test]
    fn ffi_history_append_list_remove() {
        let (_dir, handle, _guard) = ffi_studio();
        let req = c(r#"{"content":"WIFI:S:Lab;T:WPA;P:pw;;","dataUrl":"data:image/png;base64,AA=="}"#);
        let stored = read_ffi_string(qrpulse_history_append(handle, req.as_ptr()));
        let record: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(record["type"], "wifi");
        assert_eq!(record["fields"]["ssid"], "Lab");
        assert_eq!(record["dataUrl"], "data:image/png;base64,AA==");
        let id = record["id"].as_str().unwrap().to_string();

        let list: Vec<serde_json::Value> =
            serde_json::from_str(&read_ffi_string(qrpulse_history_list(handle))).unwrap();
        assert_eq!(list.len(), 1);

        let sel = read_ffi_string(qrpulse_select(handle, c(&id).as_ptr()));
        let sel: serde_json::Value = serde_json::from_str(&sel).unwrap();
        assert_eq!(sel["fields"]["password"], "pw");

        assert_eq!(qrpulse_history_remove(handle, c(&id).as_ptr()), 1);
        assert_eq!(qrpulse_history_remove(handle, c(&id).as_ptr()), 0);

        qrpulse_close(handle);
    }

    #[test]
    fn ffi_generate_scan_clear() {
        let (_dir, handle, _guard) = ffi_studio();
        let intent = c("call");
        let bag = c(r#"{"phone":"+15550100"}"#);
        let rec = read_ffi_string(qrpulse_generate(handle, intent.as_ptr(), bag.as_ptr()));
        let rec: serde_json::Value = serde_json::from_str(&rec).unwrap();
        assert_eq!(rec["content"], "tel:+15550100");

        let p = c("sms:+1?body=hey");
        let rec = read_ffi_string(qrpulse_scan_payload(handle, p.as_ptr()));
        let rec: serde_json::Value = serde_json::from_str(&rec).unwrap();
        assert_eq!(rec["fields"]["message"], "hey");

        assert_eq!(qrpulse_history_clear(handle), 1);
        let list: Vec<serde_json::Value> =
            serde_json::from_str(&read_ffi_string(qrpulse_history_list(handle))).unwrap();
        assert!(list.is_empty());

        qrpulse_close(handle);
    }

    #[test]
    fn ffi_options_roundtrip() {
        let (_dir, handle, _guard) = ffi_studio();
        let json = c(r##"{"size":512,"foreground":"#8b5cf6"}"##);
        assert_eq!(qrpulse_set_options(handle, json.as_ptr()), 1);
        let opts: serde_json::Value =
            serde_json::from_str(&read_ffi_string(qrpulse_options(handle))).unwrap();
        assert_eq!(opts["size"], 512);
        assert_eq!(opts["foreground"], "#8b5cf6");
        assert_eq!(opts["margin"], 1);
        qrpulse_close(handle);
    }
}
