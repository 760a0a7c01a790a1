// jitlog/src/sys/jni.rs
//
// JNI types needed by a JVMTI agent.
// No external dependencies - suitable for standalone use.
//
// This is the slice of jni.h an agent actually touches: the invocation
// interface (JavaVM) used to obtain the JVMTI environment, plus the opaque
// handles and primitive types that appear in JVMTI signatures. The agent
// never calls a JNI function itself, so JNIEnv stays opaque here.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::os::raw::c_void;

// --- Primitive types ---
pub type jint = i32;
pub type jlong = i64;
pub type jboolean = u8;

// --- Opaque reference types ---
pub type jobject = *mut c_void;
pub type jclass = jobject;
pub type jthread = jobject;
pub type jmethodID = *mut c_void;

// --- Return codes ---
pub const JNI_OK: jint = 0;
pub const JNI_ERR: jint = -1;
pub const JNI_EVERSION: jint = -3;

// =============================================================================
// JNIEnv - opaque
// =============================================================================
//
// Event callbacks receive a *mut JNIEnv and this agent only forwards it;
// the native-interface vtable is never dereferenced, so its 230+ entries
// are not declared.

#[repr(C)]
pub struct JNINativeInterface_ {
    _opaque: [u8; 0],
}

/// JNIEnv is directly the vtable pointer (C ABI definition)
pub type JNIEnv = *const JNINativeInterface_;

// =============================================================================
// JNIInvokeInterface_ - The JavaVM function table
// =============================================================================

#[repr(C)]
pub struct JNIInvokeInterface_ {
    pub reserved0: *mut c_void,
    pub reserved1: *mut c_void,
    pub reserved2: *mut c_void,

    pub DestroyJavaVM: unsafe extern "system" fn(vm: *mut JavaVM) -> jint,
    pub AttachCurrentThread:
        unsafe extern "system" fn(vm: *mut JavaVM, penv: *mut *mut c_void, args: *mut c_void) -> jint,
    pub DetachCurrentThread: unsafe extern "system" fn(vm: *mut JavaVM) -> jint,
    pub GetEnv:
        unsafe extern "system" fn(vm: *mut JavaVM, penv: *mut *mut c_void, version: jint) -> jint,
    pub AttachCurrentThreadAsDaemon:
        unsafe extern "system" fn(vm: *mut JavaVM, penv: *mut *mut c_void, args: *mut c_void) -> jint,
}

// =============================================================================
// JavaVM - Pointer to the JavaVM function table
// =============================================================================
//
// In C JNI, JavaVM is directly a pointer to the vtable:
//   typedef const struct JNIInvokeInterface_ *JavaVM;
// The Agent_OnLoad/Agent_OnAttach entry points therefore receive
// *mut JavaVM = *mut *const JNIInvokeInterface_.

/// JavaVM is directly the vtable pointer (C ABI definition)
pub type JavaVM = *const JNIInvokeInterface_;
