//! Raw C-ABI bindings for JNI and JVMTI.
//!
//! Everything in here mirrors the JDK headers directly; the safe surface
//! lives in [`crate::env`].

pub mod jni;
pub mod jvmti;
