//! Human-readable method signatures.
//!
//! JVMTI reports a declaring class as a JVM type descriptor
//! (`"Lcom/example/Foo;"`); the log wants `com.example.Foo`. This module
//! decodes class descriptors and composes the `Package.Class.method`
//! strings the event callbacks print.

use std::fmt;

use crate::env::Jvmti;
use crate::sys::jni;

/// Stand-in printed for a class whose descriptor could not be decoded.
pub const MALFORMED_CLASS: &str = "<malformed>";

/// A descriptor that does not match the `L<path>;` class form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    /// No leading `L`: a primitive or array descriptor, not a class.
    NotAClass,
    /// No `;` terminator.
    UnterminatedClass,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::NotAClass => write!(f, "descriptor is not a class type"),
            SignatureError::UnterminatedClass => write!(f, "descriptor has no ';' terminator"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Converts a JVM class descriptor into a dotted class name.
///
/// `"Lcom/example/Foo;"` becomes `"com.example.Foo"`: the leading `L` is
/// stripped, everything from the first `;` on is dropped, and `/` becomes
/// `.`. Inner-class `$` markers pass through untouched. Descriptors missing
/// either marker are rejected instead of truncated blindly.
pub fn class_name_from_signature(sig: &str) -> Result<String, SignatureError> {
    let rest = sig.strip_prefix('L').ok_or(SignatureError::NotAClass)?;
    let path = match rest.find(';') {
        Some(end) => &rest[..end],
        None => return Err(SignatureError::UnterminatedClass),
    };
    Ok(path.replace('/', "."))
}

/// Builds the `"Package.Class.method"` description for a method handle.
///
/// Lookups run in order: method name, declaring class, class signature.
/// Each is best-effort; if the VM cannot answer any of them the result is
/// the empty string and the caller logs the event without a description.
/// An undecodable class descriptor degrades to [`MALFORMED_CLASS`] rather
/// than dropping the line. Buffer ownership is handled inside the wrapper
/// queries, so no JVMTI memory outlives this call on any path.
pub fn describe_method(env: &Jvmti, method: jni::jmethodID) -> String {
    let (name, _sig, _generic) = match env.get_method_name(method) {
        Ok(parts) => parts,
        Err(_) => return String::new(),
    };

    let klass = match env.get_method_declaring_class(method) {
        Ok(klass) => klass,
        Err(_) => return String::new(),
    };

    let (class_sig, _class_generic) = match env.get_class_signature(klass) {
        Ok(parts) => parts,
        Err(_) => return String::new(),
    };

    let class_name = class_name_from_signature(&class_sig)
        .unwrap_or_else(|_| MALFORMED_CLASS.to_string());

    format!("{}.{}", class_name, name)
}
