//! # jitlog
//!
//! A JVMTI agent, in pure Rust with **zero dependencies**, that logs
//! JIT-compilation and exception lifecycle events for a running JVM.
//!
//! For every method the JIT compiles or unloads, the agent prints one line
//! with a human-readable signature:
//!
//! ```text
//! cbCompiledMethodLoad: java.lang.String.hashCode
//! cbCompiledMethodLoad: com.example.Foo.bar
//! cbCompiledMethodUnload: com.example.Foo.bar
//! ```
//!
//! Exception and dynamic-code events are subscribed and delivered but kept
//! quiet; their handlers are reserved hooks. The agent observes only — it
//! never rewrites bytecode, suspends threads, or touches the application.
//!
//! ## Usage
//!
//! Build the cdylib and load it at startup:
//!
//! ```bash
//! cargo build --release
//! java -agentpath:./target/release/libjitlog.so MyApp
//! ```
//!
//! or attach to a live process via the Attach API; `Agent_OnAttach` runs
//! the same bootstrap and additionally asks the VM to replay
//! compiled-method and dynamic-code events that predate the attach, so the
//! log also reflects code compiled before the agent arrived.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ agent - event callbacks, bootstrap, Agent_OnLoad /  │
//! │         Agent_OnAttach / Agent_OnUnload exports     │
//! ├─────────────────────────────────────────────────────┤
//! │ signature - descriptor decoding, method describing  │
//! ├─────────────────────────────────────────────────────┤
//! │ env - Jvmti wrapper with Result returns and owned-  │
//! │       String queries (buffer release handled here)  │
//! ├─────────────────────────────────────────────────────┤
//! │ sys - raw JNI/JVMTI types and the positional vtable │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Behavior notes
//!
//! - Callbacks can fire from any VM thread at any time. They share nothing
//!   but stdout, and each line is printed under stdout's lock.
//! - A method the VM can no longer describe still produces its event line,
//!   with an empty description.
//! - A bootstrap failure (no JVMTI, capabilities refused) returns a
//!   non-zero status to the VM and leaves the application untouched.

pub mod sys;
pub mod env;
pub mod signature;
pub mod agent;

pub use crate::env::Jvmti;
pub use crate::signature::{class_name_from_signature, describe_method, SignatureError, MALFORMED_CLASS};
