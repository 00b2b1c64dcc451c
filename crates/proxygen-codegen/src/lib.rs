//! Go source generation for interception proxies.
//!
//! A proxy wraps a real implementation of an interface and routes every call
//! through an interceptor chain:
//!
//! ```text
//! func (this *GreeterProxy) Greet(arg0 string) string {
//!     rets := this.Interceptors.Apply(
//!         []interface{}{arg0},
//!         "Greet",
//!         func(args []interface{}) []interface{} { ... },
//!     )
//!     return proxygenCaster.Cast[string](rets[0])
//! }
//! ```

pub mod emitter;
pub mod errors;
pub mod options;

pub use emitter::{CodeEmitter, HEADER, emit, render};
pub use errors::EmitError;
pub use options::{EmitOptions, RuntimeImports};
