//! # valscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the valscope library. Import this module to get quick access to everything needed
//! to print a value.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all valscope operations
pub use crate::Error;

/// The result type used throughout valscope
pub use crate::Result;

/// Cooperative cancellation of print operations
pub use crate::CancellationToken;

// ================================================================================================
// Target Access
// ================================================================================================

/// Byte order of the target
pub use crate::target::ByteOrder;

/// Memory access primitive and its faults
pub use crate::target::{PartialRead, ReadFault, TargetMemory};

/// In-process memory image of a target
pub use crate::target::{MemoryImage, MemoryProtection, MemoryRegion};

// ================================================================================================
// Types and Values
// ================================================================================================

/// Type descriptors
pub use crate::types::{Field, Type, TypeCode, TypeRef};

/// Stub resolution
pub use crate::types::{NoStubs, TypeResolver, TypeTable};

/// Raw values
pub use crate::value::Value;

// ================================================================================================
// Formatting
// ================================================================================================

/// The value formatter and its per-call options
pub use crate::format::{Pretty, PrintOptions, ValuePrinter};

/// Output sink
pub use crate::format::PrintStream;

/// Format letters
pub use crate::format::FormatLetter;

/// Source language syntax
pub use crate::language::{CLanguage, Language};

// ================================================================================================
// Configuration
// ================================================================================================

/// Print policy snapshot and limits
pub use crate::policy::{PrintLimit, PrintPolicy};

/// `set` / `show` commands
pub use crate::policy::settings::{PrintSetting, PrintSettings};
