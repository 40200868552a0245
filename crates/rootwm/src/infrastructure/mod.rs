//! Infrastructure layer for rootwm.
//!
//! Contains the display-server adapters that implement the application
//! ports: the live X11 connection and a simulated server for tests.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `rootwm_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod display;
