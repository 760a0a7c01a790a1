//! Agent behavior against a mock JVM.
//!
//! The fixtures here build real JVMTI vtables whose entries record calls
//! and allocations in a state block stored behind the env pointer — the
//! same env-points-into-a-larger-struct layout the VM itself uses. Every
//! handed-out buffer is a `CString::into_raw` counted in `allocated`;
//! `Deallocate` reclaims it and counts `released`, so a leak on any path
//! shows up as a counter mismatch.

use std::ffi::CString;
use std::os::raw::{c_char, c_uchar, c_void};
use std::ptr;

use jitlog::agent::{self, event_line};
use jitlog::env::Jvmti;
use jitlog::signature::{describe_method, MALFORMED_CLASS};
use jitlog::sys::{jni, jvmti};

const FAKE_METHOD: jni::jmethodID = 0x51 as jni::jmethodID;
const FAKE_CLASS: jni::jclass = 0xC1A55 as jni::jclass;

#[derive(Default)]
struct MockState {
    method_name: Option<CString>,
    method_sig: Option<CString>,
    method_generic: Option<CString>,
    class_sig: Option<CString>,
    class_generic: Option<CString>,

    fail_method_name: bool,
    fail_declaring_class: bool,
    fail_class_signature: bool,
    fail_add_capabilities: bool,

    allocated: usize,
    released: usize,
    add_capabilities_calls: usize,
    set_callbacks_calls: usize,
    granted: Option<jvmti::jvmtiCapabilities>,
    registered: Option<jvmti::jvmtiEventCallbacks>,
    enabled_events: Vec<u32>,
    replay_requests: Vec<u32>,
}

/// The env pointer handed to the agent points at the first field.
#[repr(C)]
struct MockEnv {
    env: jvmti::jvmtiEnv,
    state: MockState,
}

/// Likewise for the JavaVM pointer.
#[repr(C)]
struct MockVm {
    vm: jni::JavaVM,
    env_ptr: *mut jvmti::jvmtiEnv,
    fail_get_env: bool,
}

unsafe fn state_of<'a>(env: *mut jvmti::jvmtiEnv) -> &'a mut MockState {
    &mut (*(env as *mut MockEnv)).state
}

// --- JVMTI function table entries ---

unsafe extern "system" fn mock_get_method_name(
    env: *mut jvmti::jvmtiEnv,
    _method: jni::jmethodID,
    name_ptr: *mut *mut c_char,
    signature_ptr: *mut *mut c_char,
    generic_ptr: *mut *mut c_char,
) -> jvmti::jvmtiError {
    let st = state_of(env);
    if st.fail_method_name {
        return jvmti::jvmtiError::INVALID_METHODID;
    }

    let name = st.method_name.clone().expect("mock method name unset");
    *name_ptr = name.into_raw();
    st.allocated += 1;

    let sig = st.method_sig.clone().expect("mock method sig unset");
    *signature_ptr = sig.into_raw();
    st.allocated += 1;

    match st.method_generic.clone() {
        Some(generic) => {
            *generic_ptr = generic.into_raw();
            st.allocated += 1;
        }
        None => *generic_ptr = ptr::null_mut(),
    }

    jvmti::jvmtiError::NONE
}

unsafe extern "system" fn mock_get_method_declaring_class(
    env: *mut jvmti::jvmtiEnv,
    _method: jni::jmethodID,
    declaring_class_ptr: *mut jni::jclass,
) -> jvmti::jvmtiError {
    let st = state_of(env);
    if st.fail_declaring_class {
        return jvmti::jvmtiError::INVALID_METHODID;
    }
    *declaring_class_ptr = FAKE_CLASS;
    jvmti::jvmtiError::NONE
}

unsafe extern "system" fn mock_get_class_signature(
    env: *mut jvmti::jvmtiEnv,
    _klass: jni::jclass,
    signature_ptr: *mut *mut c_char,
    generic_ptr: *mut *mut c_char,
) -> jvmti::jvmtiError {
    let st = state_of(env);
    if st.fail_class_signature {
        return jvmti::jvmtiError::INVALID_CLASS;
    }

    let sig = st.class_sig.clone().expect("mock class sig unset");
    *signature_ptr = sig.into_raw();
    st.allocated += 1;

    match st.class_generic.clone() {
        Some(generic) => {
            *generic_ptr = generic.into_raw();
            st.allocated += 1;
        }
        None => *generic_ptr = ptr::null_mut(),
    }

    jvmti::jvmtiError::NONE
}

unsafe extern "system" fn mock_deallocate(
    env: *mut jvmti::jvmtiEnv,
    mem: *mut c_uchar,
) -> jvmti::jvmtiError {
    if !mem.is_null() {
        drop(CString::from_raw(mem as *mut c_char));
        state_of(env).released += 1;
    }
    jvmti::jvmtiError::NONE
}

unsafe extern "system" fn mock_add_capabilities(
    env: *mut jvmti::jvmtiEnv,
    caps: *const jvmti::jvmtiCapabilities,
) -> jvmti::jvmtiError {
    let st = state_of(env);
    st.add_capabilities_calls += 1;
    if st.fail_add_capabilities {
        return jvmti::jvmtiError::NOT_AVAILABLE;
    }
    st.granted = Some(*caps);
    jvmti::jvmtiError::NONE
}

unsafe extern "system" fn mock_set_event_callbacks(
    env: *mut jvmti::jvmtiEnv,
    callbacks: *const jvmti::jvmtiEventCallbacks,
    size: jni::jint,
) -> jvmti::jvmtiError {
    let st = state_of(env);
    st.set_callbacks_calls += 1;
    assert_eq!(size as usize, std::mem::size_of::<jvmti::jvmtiEventCallbacks>());
    st.registered = Some(*callbacks);
    jvmti::jvmtiError::NONE
}

unsafe extern "system" fn mock_set_event_notification_mode(
    env: *mut jvmti::jvmtiEnv,
    mode: jni::jint,
    event_type: u32,
    _thread: jni::jthread,
) -> jvmti::jvmtiError {
    if mode == jvmti::JVMTI_ENABLE {
        state_of(env).enabled_events.push(event_type);
    }
    jvmti::jvmtiError::NONE
}

unsafe extern "system" fn mock_generate_events(
    env: *mut jvmti::jvmtiEnv,
    event_type: u32,
) -> jvmti::jvmtiError {
    state_of(env).replay_requests.push(event_type);
    // The VM only defines replay for these two kinds.
    match event_type {
        jvmti::JVMTI_EVENT_COMPILED_METHOD_LOAD | jvmti::JVMTI_EVENT_DYNAMIC_CODE_GENERATED => {
            jvmti::jvmtiError::NONE
        }
        _ => jvmti::jvmtiError::ILLEGAL_ARGUMENT,
    }
}

fn function_table() -> jvmti::jvmtiInterface_1_ {
    let mut table = jvmti::jvmtiInterface_1_::default();
    table.SetEventNotificationMode = Some(mock_set_event_notification_mode);
    table.Deallocate = Some(mock_deallocate);
    table.GetClassSignature = Some(mock_get_class_signature);
    table.GetMethodName = Some(mock_get_method_name);
    table.GetMethodDeclaringClass = Some(mock_get_method_declaring_class);
    table.SetEventCallbacks = Some(mock_set_event_callbacks);
    table.GenerateEvents = Some(mock_generate_events);
    table.AddCapabilities = Some(mock_add_capabilities);
    table
}

// --- JavaVM invoke interface entries ---

unsafe extern "system" fn mock_get_env(
    vm: *mut jni::JavaVM,
    penv: *mut *mut c_void,
    _version: jni::jint,
) -> jni::jint {
    let mock = &mut *(vm as *mut MockVm);
    if mock.fail_get_env {
        return jni::JNI_EVERSION;
    }
    *penv = mock.env_ptr as *mut c_void;
    jni::JNI_OK
}

unsafe extern "system" fn vm_unsupported(_vm: *mut jni::JavaVM) -> jni::jint {
    jni::JNI_ERR
}

unsafe extern "system" fn vm_unsupported_attach(
    _vm: *mut jni::JavaVM,
    _penv: *mut *mut c_void,
    _args: *mut c_void,
) -> jni::jint {
    jni::JNI_ERR
}

/// Owns the boxed vtables and state so every pointer the agent sees stays
/// valid for the fixture's lifetime.
struct MockJvm {
    _functions: Box<jvmti::jvmtiInterface_1_>,
    env: Box<MockEnv>,
    _invoke: Box<jni::JNIInvokeInterface_>,
    vm: Box<MockVm>,
}

impl MockJvm {
    fn new(state: MockState) -> Self {
        let functions = Box::new(function_table());
        let mut env = Box::new(MockEnv {
            env: jvmti::jvmtiEnv { functions: &*functions },
            state,
        });
        let invoke = Box::new(jni::JNIInvokeInterface_ {
            reserved0: ptr::null_mut(),
            reserved1: ptr::null_mut(),
            reserved2: ptr::null_mut(),
            DestroyJavaVM: vm_unsupported,
            AttachCurrentThread: vm_unsupported_attach,
            DetachCurrentThread: vm_unsupported,
            GetEnv: mock_get_env,
            AttachCurrentThreadAsDaemon: vm_unsupported_attach,
        });
        let vm = Box::new(MockVm {
            vm: &*invoke,
            env_ptr: &mut env.env,
            fail_get_env: false,
        });
        MockJvm { _functions: functions, env, _invoke: invoke, vm }
    }

    fn env_ptr(&mut self) -> *mut jvmti::jvmtiEnv {
        &mut self.env.env
    }

    fn vm_ptr(&mut self) -> *mut jni::JavaVM {
        &mut self.vm.vm
    }

    fn state(&self) -> &MockState {
        &self.env.state
    }
}

fn healthy_state() -> MockState {
    MockState {
        method_name: Some(CString::new("bar").unwrap()),
        method_sig: Some(CString::new("()V").unwrap()),
        class_sig: Some(CString::new("Lcom/example/Foo;").unwrap()),
        ..MockState::default()
    }
}

// --- describe_method ---

#[test]
fn describe_composes_dotted_signature() {
    let mut jvm = MockJvm::new(healthy_state());
    let env = unsafe { Jvmti::from_raw(jvm.env_ptr()) };

    assert_eq!(describe_method(&env, FAKE_METHOD), "com.example.Foo.bar");

    // name + method sig + class sig, no generics in play
    let st = jvm.state();
    assert_eq!(st.allocated, 3);
    assert_eq!(st.released, 3);
}

#[test]
fn describe_releases_generic_signature_buffers_it_never_prints() {
    let mut state = healthy_state();
    state.method_generic = Some(CString::new("<T:Ljava/lang/Object;>()V").unwrap());
    state.class_generic = Some(CString::new("<T:Ljava/lang/Object;>Ljava/lang/Object;").unwrap());
    let mut jvm = MockJvm::new(state);
    let env = unsafe { Jvmti::from_raw(jvm.env_ptr()) };

    assert_eq!(describe_method(&env, FAKE_METHOD), "com.example.Foo.bar");

    let st = jvm.state();
    assert_eq!(st.allocated, 5);
    assert_eq!(st.released, 5);
}

#[test]
fn describe_swallows_method_name_failure() {
    let mut state = healthy_state();
    state.fail_method_name = true;
    let mut jvm = MockJvm::new(state);
    let env = unsafe { Jvmti::from_raw(jvm.env_ptr()) };

    assert_eq!(describe_method(&env, FAKE_METHOD), "");

    let st = jvm.state();
    assert_eq!(st.allocated, 0);
    assert_eq!(st.released, 0);
}

#[test]
fn describe_swallows_declaring_class_failure_without_leaking() {
    let mut state = healthy_state();
    state.method_generic = Some(CString::new("<T:Ljava/lang/Object;>()V").unwrap());
    state.fail_declaring_class = true;
    let mut jvm = MockJvm::new(state);
    let env = unsafe { Jvmti::from_raw(jvm.env_ptr()) };

    assert_eq!(describe_method(&env, FAKE_METHOD), "");

    // The three method-name buffers were already handed out; all returned.
    let st = jvm.state();
    assert_eq!(st.allocated, 3);
    assert_eq!(st.released, 3);
}

#[test]
fn describe_swallows_class_signature_failure_without_leaking() {
    let mut state = healthy_state();
    state.fail_class_signature = true;
    let mut jvm = MockJvm::new(state);
    let env = unsafe { Jvmti::from_raw(jvm.env_ptr()) };

    assert_eq!(describe_method(&env, FAKE_METHOD), "");

    let st = jvm.state();
    assert_eq!(st.allocated, 2);
    assert_eq!(st.released, 2);
}

#[test]
fn describe_marks_malformed_class_descriptor() {
    let mut state = healthy_state();
    state.class_sig = Some(CString::new("com/example/Foo").unwrap());
    let mut jvm = MockJvm::new(state);
    let env = unsafe { Jvmti::from_raw(jvm.env_ptr()) };

    assert_eq!(
        describe_method(&env, FAKE_METHOD),
        format!("{}.bar", MALFORMED_CLASS)
    );

    let st = jvm.state();
    assert_eq!(st.allocated, st.released);
}

// --- event lines ---

#[test]
fn event_lines_match_expected_format() {
    assert_eq!(
        event_line("cbCompiledMethodLoad", "com.example.Foo.bar"),
        "cbCompiledMethodLoad: com.example.Foo.bar"
    );
    assert_eq!(
        event_line("cbCompiledMethodUnload", ""),
        "cbCompiledMethodUnload: "
    );
}

// --- callbacks against the mock env ---

#[test]
fn compile_callbacks_run_against_mock_env_without_leaking() {
    let mut jvm = MockJvm::new(healthy_state());

    unsafe {
        agent::compiled_method_load(
            jvm.env_ptr(),
            FAKE_METHOD,
            0,
            ptr::null(),
            0,
            ptr::null(),
            ptr::null(),
        );
        agent::compiled_method_unload(jvm.env_ptr(), FAKE_METHOD, ptr::null());
    }

    let st = jvm.state();
    assert_eq!(st.allocated, 6);
    assert_eq!(st.released, 6);
}

#[test]
fn compile_callbacks_tolerate_host_failures() {
    let mut state = healthy_state();
    state.fail_method_name = true;
    let mut jvm = MockJvm::new(state);

    unsafe {
        agent::compiled_method_load(
            jvm.env_ptr(),
            FAKE_METHOD,
            0,
            ptr::null(),
            0,
            ptr::null(),
            ptr::null(),
        );
        agent::compiled_method_unload(jvm.env_ptr(), FAKE_METHOD, ptr::null());
    }

    let st = jvm.state();
    assert_eq!(st.allocated, 0);
    assert_eq!(st.released, 0);
}

// --- bootstrap ---

#[test]
fn bootstrap_wires_capabilities_callbacks_events_and_replay() {
    let mut jvm = MockJvm::new(healthy_state());

    let rc = unsafe { agent::Agent_OnAttach(jvm.vm_ptr(), ptr::null_mut(), ptr::null_mut()) };
    assert_eq!(rc, jni::JNI_OK);

    let st = jvm.state();
    assert_eq!(st.add_capabilities_calls, 1);
    assert_eq!(st.set_callbacks_calls, 1);

    let granted = st.granted.expect("capabilities recorded");
    assert!(granted.can_generate_compiled_method_load_events());
    assert!(granted.can_generate_exception_events());

    let registered = st.registered.expect("callbacks recorded");
    assert!(registered.CompiledMethodLoad.is_some());
    assert!(registered.CompiledMethodUnload.is_some());
    assert!(registered.DynamicCodeGenerated.is_some());
    assert!(registered.Exception.is_some());
    assert!(registered.ExceptionCatch.is_some());

    assert_eq!(st.enabled_events, agent::SUBSCRIBED_EVENTS.to_vec());
    assert_eq!(
        st.replay_requests,
        vec![
            jvmti::JVMTI_EVENT_DYNAMIC_CODE_GENERATED,
            jvmti::JVMTI_EVENT_COMPILED_METHOD_LOAD,
            jvmti::JVMTI_EVENT_COMPILED_METHOD_UNLOAD,
        ]
    );
}

#[test]
fn load_entry_runs_the_same_bootstrap() {
    let mut jvm = MockJvm::new(healthy_state());

    let rc = unsafe { agent::Agent_OnLoad(jvm.vm_ptr(), ptr::null_mut(), ptr::null_mut()) };
    assert_eq!(rc, jni::JNI_OK);
    assert_eq!(jvm.state().set_callbacks_calls, 1);
}

#[test]
fn bootstrap_stops_after_capability_refusal() {
    let mut state = healthy_state();
    state.fail_add_capabilities = true;
    let mut jvm = MockJvm::new(state);

    let rc = unsafe { agent::Agent_OnLoad(jvm.vm_ptr(), ptr::null_mut(), ptr::null_mut()) };
    assert_eq!(rc, jni::JNI_ERR);

    let st = jvm.state();
    assert_eq!(st.add_capabilities_calls, 1);
    assert_eq!(st.set_callbacks_calls, 0);
    assert!(st.enabled_events.is_empty());
    assert!(st.replay_requests.is_empty());
}

#[test]
fn bootstrap_fails_cleanly_when_jvmti_is_unavailable() {
    let mut jvm = MockJvm::new(healthy_state());
    jvm.vm.fail_get_env = true;

    let rc = unsafe { agent::Agent_OnLoad(jvm.vm_ptr(), ptr::null_mut(), ptr::null_mut()) };
    assert_eq!(rc, jni::JNI_ERR);
    assert_eq!(jvm.state().add_capabilities_calls, 0);
}
