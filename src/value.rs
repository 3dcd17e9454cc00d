//! Raw values: bytes captured from the target paired with the type that explains them.
//!
//! A [`Value`] is created per print request from already-fetched bytes and is never mutated.
//! Its contents are in target byte order.
//!
//! # Repeated Values
//!
//! A value with a repetition count above one stands for that many consecutive objects of its
//! type, as produced by an `addr@count` style replication operator. The buffer then holds
//! `length * repetitions` bytes and the formatter prints it like an array.

use crate::{
    target::TargetMemory,
    types::TypeRef,
    Error, Result,
};

/// A typed block of target bytes.
#[derive(Debug, Clone)]
pub struct Value {
    ty: TypeRef,
    contents: Option<Vec<u8>>,
    address: Option<u64>,
    optimized_out: bool,
    repetitions: usize,
}

impl Value {
    /// Creates a computed value (one without a target address).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if `contents` is shorter than the type.
    pub fn new(ty: TypeRef, contents: Vec<u8>) -> Result<Self> {
        Self::repeated(ty, contents, 1)
    }

    /// Creates a value standing for `repetitions` consecutive objects of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if `contents` is shorter than
    /// `ty.length() * max(repetitions, 1)`.
    pub fn repeated(ty: TypeRef, contents: Vec<u8>, repetitions: usize) -> Result<Self> {
        let required = ty
            .length()
            .checked_mul(repetitions.max(1))
            .ok_or_else(|| malformed_error!("value size overflows"))?;
        if contents.len() < required {
            return Err(malformed_error!(
                "value holds {} bytes, type needs {}",
                contents.len(),
                required
            ));
        }

        Ok(Value {
            ty,
            contents: Some(contents),
            address: None,
            optimized_out: false,
            repetitions,
        })
    }

    /// Reads a value of type `ty` from target memory at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemoryRead`] if the bytes cannot be read.
    pub fn fetch(memory: &dyn TargetMemory, ty: TypeRef, address: u64) -> Result<Self> {
        Self::fetch_repeated(memory, ty, address, 1)
    }

    /// Reads `repetitions` consecutive objects of type `ty` starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemoryRead`] if the bytes cannot be read.
    pub fn fetch_repeated(
        memory: &dyn TargetMemory,
        ty: TypeRef,
        address: u64,
        repetitions: usize,
    ) -> Result<Self> {
        let size = ty
            .length()
            .checked_mul(repetitions.max(1))
            .ok_or_else(|| malformed_error!("value size overflows"))?;
        let mut contents = vec![0u8; size];
        memory
            .read_exact(address, &mut contents)
            .map_err(|fault| Error::MemoryRead {
                address,
                reason: fault.to_string(),
            })?;

        Ok(Self::repeated(ty, contents, repetitions)?.at(address))
    }

    /// Creates a value whose contents were optimized out.
    #[must_use]
    pub fn optimized_out(ty: TypeRef) -> Self {
        Value {
            ty,
            contents: None,
            address: None,
            optimized_out: true,
            repetitions: 1,
        }
    }

    /// Creates a value without storage.
    #[must_use]
    pub fn unavailable(ty: TypeRef) -> Self {
        Value {
            ty,
            contents: None,
            address: None,
            optimized_out: false,
            repetitions: 1,
        }
    }

    /// Attaches the target address the contents were read from.
    #[must_use]
    pub fn at(mut self, address: u64) -> Self {
        self.address = Some(address);
        self
    }

    /// Returns the type of this value (of one element, for repeated values).
    #[must_use]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Returns the bytes of this value, `None` if it has no storage.
    #[must_use]
    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    /// Returns the target address, `None` for computed values.
    #[must_use]
    pub fn address(&self) -> Option<u64> {
        self.address
    }

    /// Returns `true` if the contents were optimized out.
    #[must_use]
    pub fn is_optimized_out(&self) -> bool {
        self.optimized_out
    }

    /// Returns the repetition count.
    #[must_use]
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Returns `true` if this value stands for more than one object.
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.repetitions > 1
    }
}
