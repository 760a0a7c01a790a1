//! The event-logger agent: callbacks, bootstrap, and the exported
//! `Agent_OnLoad` / `Agent_OnAttach` entry points.
//!
//! The VM invokes the callbacks below from its own threads, possibly
//! concurrently. Each one is a pure function of its arguments plus a single
//! `println!` (which locks stdout per call, so lines never interleave); no
//! shared state, no blocking.
//!
//! One line per logged event goes to stdout; bootstrap diagnostics go to
//! stderr with a `[jitlog]` prefix.

use std::os::raw::{c_char, c_void};

use crate::env::Jvmti;
use crate::signature::describe_method;
use crate::sys::{jni, jvmti};

/// Event kinds this agent subscribes to.
pub const SUBSCRIBED_EVENTS: [u32; 5] = [
    jvmti::JVMTI_EVENT_COMPILED_METHOD_LOAD,
    jvmti::JVMTI_EVENT_COMPILED_METHOD_UNLOAD,
    jvmti::JVMTI_EVENT_DYNAMIC_CODE_GENERATED,
    jvmti::JVMTI_EVENT_EXCEPTION,
    jvmti::JVMTI_EVENT_EXCEPTION_CATCH,
];

/// Composes one log line: `"<tag>: <description>"`.
///
/// The description may be empty, in which case the line ends after the
/// separator. Factored out so the exact output is testable without
/// capturing stdout.
pub fn event_line(tag: &str, description: &str) -> String {
    format!("{}: {}", tag, description)
}

// --- Event callbacks ---
//
// ABI dictated by jvmtiEventCallbacks; one free function per event kind.
// None of these may panic: an unwind across the `extern "system"` boundary
// would take the host process down with it.

pub unsafe extern "system" fn compiled_method_load(
    jvmti_env: *mut jvmti::jvmtiEnv,
    method: jni::jmethodID,
    _code_size: jni::jint,
    _code_addr: *const c_void,
    _map_length: jni::jint,
    _map: *const c_void,
    _compile_info: *const c_void,
) {
    let env = Jvmti::from_raw(jvmti_env);
    println!("{}", event_line("cbCompiledMethodLoad", &describe_method(&env, method)));
}

pub unsafe extern "system" fn compiled_method_unload(
    jvmti_env: *mut jvmti::jvmtiEnv,
    method: jni::jmethodID,
    _code_addr: *const c_void,
) {
    let env = Jvmti::from_raw(jvmti_env);
    println!("{}", event_line("cbCompiledMethodUnload", &describe_method(&env, method)));
}

pub unsafe extern "system" fn dynamic_code_generated(
    _jvmti_env: *mut jvmti::jvmtiEnv,
    _name: *const c_char,
    _address: *const c_void,
    _length: jni::jint,
) {
    // println!("cbDynamicCodeGenerated: {:?} at {:p}", _name, _address);
}

pub unsafe extern "system" fn exception(
    _jvmti_env: *mut jvmti::jvmtiEnv,
    _jni_env: *mut jni::JNIEnv,
    _thread: jni::jthread,
    _method: jni::jmethodID,
    _location: jvmti::jlocation,
    _exception: jni::jobject,
    _catch_method: jni::jmethodID,
    _catch_location: jvmti::jlocation,
) {
    // let env = Jvmti::from_raw(_jvmti_env);
    // println!("{}", event_line("cbException", &describe_method(&env, _method)));
}

pub unsafe extern "system" fn exception_catch(
    _jvmti_env: *mut jvmti::jvmtiEnv,
    _jni_env: *mut jni::JNIEnv,
    _thread: jni::jthread,
    _method: jni::jmethodID,
    _location: jvmti::jlocation,
    _exception: jni::jobject,
) {
    // println!("cbExceptionCatch");
}

// --- Registration ---

/// Returns the callbacks table with all five subscribed events wired up,
/// quiet handlers included.
pub fn event_callbacks() -> jvmti::jvmtiEventCallbacks {
    let mut callbacks = jvmti::jvmtiEventCallbacks::default();

    callbacks.CompiledMethodLoad = Some(compiled_method_load);
    callbacks.CompiledMethodUnload = Some(compiled_method_unload);
    callbacks.DynamicCodeGenerated = Some(dynamic_code_generated);
    callbacks.Exception = Some(exception);
    callbacks.ExceptionCatch = Some(exception_catch);

    callbacks
}

/// Capabilities the subscribed events require.
pub fn required_capabilities() -> jvmti::jvmtiCapabilities {
    let mut caps = jvmti::jvmtiCapabilities::default();
    caps.set_can_generate_compiled_method_load_events(true);
    caps.set_can_generate_exception_events(true);
    caps
}

/// Shared bootstrap for `Agent_OnLoad` and `Agent_OnAttach`.
///
/// Runs once per load/attach: acquire JVMTI, declare capabilities, register
/// callbacks, enable notifications, then ask the VM to replay pre-existing
/// compile events. Any failure before event delivery is wired up returns a
/// non-zero status to the VM and performs nothing further; the host process
/// itself is never taken down.
fn agent_main(vm: *mut jni::JavaVM) -> jni::jint {
    let jvmti_env = match Jvmti::new(vm) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("[jitlog] failed to get JVMTI environment: {}", e);
            return jni::JNI_ERR;
        }
    };

    if let Err(e) = jvmti_env.add_capabilities(&required_capabilities()) {
        eprintln!("[jitlog] failed to add capabilities: {:?}", e);
        return jni::JNI_ERR;
    }

    if let Err(e) = jvmti_env.set_event_callbacks(event_callbacks()) {
        eprintln!("[jitlog] failed to set callbacks: {:?}", e);
        return jni::JNI_ERR;
    }

    if let Err(e) = jvmti_env.enable_events_global(&SUBSCRIBED_EVENTS) {
        eprintln!("[jitlog] failed to enable events: {:?}", e);
        return jni::JNI_ERR;
    }

    // Replay what the VM compiled before we attached. Only dynamic-code and
    // compiled-method-load replays are defined; the unload request is
    // best-effort.
    let _ = jvmti_env.generate_events(jvmti::JVMTI_EVENT_DYNAMIC_CODE_GENERATED);
    let _ = jvmti_env.generate_events(jvmti::JVMTI_EVENT_COMPILED_METHOD_LOAD);
    let _ = jvmti_env.generate_events(jvmti::JVMTI_EVENT_COMPILED_METHOD_UNLOAD);

    jni::JNI_OK
}

// --- Entry points ---
//
// The VM resolves these three symbols from the cdylib. Load and attach run
// the identical sequence; the options string is accepted but unused.

#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Agent_OnLoad(
    vm: *mut jni::JavaVM,
    _options: *mut c_char,
    _reserved: *mut c_void,
) -> jni::jint {
    eprintln!("[jitlog] Agent_OnLoad");
    agent_main(vm)
}

#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Agent_OnAttach(
    vm: *mut jni::JavaVM,
    _options: *mut c_char,
    _reserved: *mut c_void,
) -> jni::jint {
    eprintln!("[jitlog] Agent_OnAttach");
    agent_main(vm)
}

#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Agent_OnUnload(_vm: *mut jni::JavaVM) {
    // The VM owns the agent's lifetime; nothing to tear down.
}
