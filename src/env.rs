//! High-level wrapper around the JVMTI environment.
//!
//! [`Jvmti`] wraps the raw `jvmtiEnv` pointer and exposes the operations the
//! agent needs with `Result` returns. String-returning queries copy the
//! host's buffers into owned `String`s and release every non-null buffer
//! before returning, so callers never see JVMTI-allocated memory on any
//! path, success or error.

use std::ptr;

use crate::sys::jni;
use crate::sys::jvmti;

/// A safe wrapper around the raw JVMTI Environment pointer.
pub struct Jvmti {
    // Kept private so callers can't touch the raw pointer directly.
    env: *mut jvmti::jvmtiEnv,
}

impl Jvmti {
    /// Connects to the JVM and retrieves the JVMTI environment.
    pub fn new(vm: *mut jni::JavaVM) -> Result<Self, jni::jint> {
        let mut env_ptr: *mut std::ffi::c_void = ptr::null_mut();

        unsafe {
            // Access GetEnv directly from the vtable:
            // vm: *mut JavaVM = *mut *const JNIInvokeInterface_
            // **vm: JNIInvokeInterface_ (the vtable itself)
            let get_env_fn = (**vm).GetEnv;

            let res = get_env_fn(vm, &mut env_ptr, jvmti::JVMTI_VERSION_1_2);

            if res != jni::JNI_OK {
                return Err(res);
            }
        }

        Ok(Jvmti {
            env: env_ptr as *mut jvmti::jvmtiEnv,
        })
    }

    /// Create a Jvmti wrapper from a raw jvmtiEnv pointer (callback context).
    ///
    /// # Safety
    /// The caller must ensure the pointer is valid for the duration of use.
    pub unsafe fn from_raw(env: *mut jvmti::jvmtiEnv) -> Self {
        Jvmti { env }
    }

    /// Get the raw jvmtiEnv pointer
    pub fn raw(&self) -> *mut jvmti::jvmtiEnv {
        self.env
    }

    pub fn add_capabilities(&self, new_caps: &jvmti::jvmtiCapabilities) -> Result<(), jvmti::jvmtiError> {
        unsafe {
            // Slot 142. If this panics, the VM handed out a table without
            // AddCapabilities, which no conforming JVM does.
            let add_caps_fn = (*(*self.env).functions).AddCapabilities.unwrap();

            let err = add_caps_fn(self.env, new_caps);
            if err != jvmti::jvmtiError::NONE {
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn set_event_callbacks(&self, callbacks: jvmti::jvmtiEventCallbacks) -> Result<(), jvmti::jvmtiError> {
        unsafe {
            let set_callbacks_fn = (*(*self.env).functions).SetEventCallbacks.unwrap();
            let size = std::mem::size_of::<jvmti::jvmtiEventCallbacks>() as i32;

            let err = set_callbacks_fn(self.env, &callbacks, size);
            if err != jvmti::jvmtiError::NONE {
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn set_event_notification_mode(&self, enable: bool, event_type: u32, thread: jni::jthread) -> Result<(), jvmti::jvmtiError> {
        unsafe {
            let set_mode_fn = (*(*self.env).functions).SetEventNotificationMode.unwrap();
            let mode = if enable { jvmti::JVMTI_ENABLE } else { jvmti::JVMTI_DISABLE };

            // thread can be null (all threads)
            let err = set_mode_fn(self.env, mode, event_type, thread);

            if err != jvmti::jvmtiError::NONE {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Enables each listed event kind globally (all threads).
    pub fn enable_events_global(&self, events: &[u32]) -> Result<(), jvmti::jvmtiError> {
        for &event in events {
            self.set_event_notification_mode(true, event, ptr::null_mut())?;
        }
        Ok(())
    }

    /// Asks the VM to replay already-existing events of `event_type`.
    ///
    /// The VM defines this for CompiledMethodLoad and DynamicCodeGenerated;
    /// anything else reports an error.
    pub fn generate_events(&self, event_type: u32) -> Result<(), jvmti::jvmtiError> {
        unsafe {
            let gen_fn = (*(*self.env).functions).GenerateEvents.unwrap();
            let err = gen_fn(self.env, event_type);

            if err != jvmti::jvmtiError::NONE {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Returns a JVMTI-allocated buffer to the VM. Null is a no-op.
    pub fn deallocate(&self, mem: *mut u8) -> Result<(), jvmti::jvmtiError> {
        if mem.is_null() {
            return Ok(());
        }
        unsafe {
            let deallocate_fn = (*(*self.env).functions).Deallocate.unwrap();
            let err = deallocate_fn(self.env, mem);

            if err != jvmti::jvmtiError::NONE {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Returns `(name, signature, generic_signature)` for a method.
    ///
    /// All three buffers (the generic one may be absent) are copied and
    /// released before this returns.
    pub fn get_method_name(&self, method: jni::jmethodID) -> Result<(String, String, Option<String>), jvmti::jvmtiError> {
        let mut name_ptr: *mut std::os::raw::c_char = ptr::null_mut();
        let mut sig_ptr: *mut std::os::raw::c_char = ptr::null_mut();
        let mut gen_ptr: *mut std::os::raw::c_char = ptr::null_mut();

        unsafe {
            let get_method_name_fn = (*(*self.env).functions).GetMethodName.unwrap();
            let err = get_method_name_fn(self.env, method, &mut name_ptr, &mut sig_ptr, &mut gen_ptr);

            if err != jvmti::jvmtiError::NONE {
                // On error the VM writes nothing; the out-pointers are still null.
                return Err(err);
            }

            let name = std::ffi::CStr::from_ptr(name_ptr).to_string_lossy().into_owned();
            let signature = std::ffi::CStr::from_ptr(sig_ptr).to_string_lossy().into_owned();
            let generic = if !gen_ptr.is_null() {
                Some(std::ffi::CStr::from_ptr(gen_ptr).to_string_lossy().into_owned())
            } else {
                None
            };

            // Release is unconditional: a failed Deallocate must not stop
            // the remaining buffers from being returned to the VM.
            let _ = self.deallocate(name_ptr as *mut u8);
            let _ = self.deallocate(sig_ptr as *mut u8);
            let _ = self.deallocate(gen_ptr as *mut u8);

            Ok((name, signature, generic))
        }
    }

    pub fn get_method_declaring_class(&self, method: jni::jmethodID) -> Result<jni::jclass, jvmti::jvmtiError> {
        let mut klass: jni::jclass = ptr::null_mut();

        unsafe {
            let get_declaring_fn = (*(*self.env).functions).GetMethodDeclaringClass.unwrap();
            let err = get_declaring_fn(self.env, method, &mut klass);

            if err != jvmti::jvmtiError::NONE {
                return Err(err);
            }
        }

        Ok(klass)
    }

    /// Returns `(signature, generic_signature)` for a class, e.g.
    /// `("Ljava/lang/String;", None)`. Both buffers are released before
    /// this returns.
    pub fn get_class_signature(&self, klass: jni::jclass) -> Result<(String, Option<String>), jvmti::jvmtiError> {
        let mut sig_ptr: *mut std::os::raw::c_char = ptr::null_mut();
        let mut gen_ptr: *mut std::os::raw::c_char = ptr::null_mut();

        unsafe {
            let get_class_sig_fn = (*(*self.env).functions).GetClassSignature.unwrap();
            let err = get_class_sig_fn(self.env, klass, &mut sig_ptr, &mut gen_ptr);

            if err != jvmti::jvmtiError::NONE {
                return Err(err);
            }

            let signature = std::ffi::CStr::from_ptr(sig_ptr).to_string_lossy().into_owned();
            let generic = if !gen_ptr.is_null() {
                Some(std::ffi::CStr::from_ptr(gen_ptr).to_string_lossy().into_owned())
            } else {
                None
            };

            let _ = self.deallocate(sig_ptr as *mut u8);
            let _ = self.deallocate(gen_ptr as *mut u8);

            Ok((signature, generic))
        }
    }
}
