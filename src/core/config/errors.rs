//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A kernel or block size that must be odd was even.
    #[error("{field} must be a positive odd integer, got {value}")]
    EvenKernelSize { field: &'static str, value: u32 },

    /// A kernel or block size was below its minimum.
    #[error("{field} must be at least {min}, got {value}")]
    KernelTooSmall {
        field: &'static str,
        value: u32,
        min: u32,
    },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A trait for validating configuration parameters.
///
/// Implementors check their own fields in [`ConfigValidator::validate`] and can
/// lean on the provided helpers for the common checks.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates a filter window size.
    ///
    /// The size must be odd and no smaller than `min`.
    ///
    /// # Arguments
    ///
    /// * `value` - The window size to validate.
    /// * `min` - The smallest accepted size.
    /// * `field` - The name of the field being validated.
    fn validate_odd_window(
        &self,
        value: u32,
        min: u32,
        field: &'static str,
    ) -> Result<(), ConfigError> {
        if value < min {
            return Err(ConfigError::KernelTooSmall { field, value, min });
        }
        if value % 2 == 0 {
            return Err(ConfigError::EvenKernelSize { field, value });
        }
        Ok(())
    }

    /// Validates a float value is finite and not negative.
    fn validate_non_negative_f32(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if !value.is_finite() || value < 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be finite and >= 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a u32 value is positive.
    fn validate_positive_u32(&self, value: u32, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }
}

/// Extension trait for ConfigValidator that wraps validation errors.
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates configuration and wraps any errors into `OCRError::Config`.
    fn validate_and_wrap_ocr_error(self) -> Result<Self, crate::core::errors::OCRError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

// Blanket implementation for all ConfigValidator types
impl<T: ConfigValidator> ConfigValidatorExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestValidator;
    impl ConfigValidator for TestValidator {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            TestValidator
        }
    }

    #[test]
    fn test_validate_odd_window() {
        let validator = TestValidator;
        assert!(validator.validate_odd_window(5, 1, "kernel").is_ok());
        assert!(validator.validate_odd_window(1, 1, "kernel").is_ok());
        assert_eq!(
            validator.validate_odd_window(4, 1, "kernel"),
            Err(ConfigError::EvenKernelSize {
                field: "kernel",
                value: 4
            })
        );
        assert_eq!(
            validator.validate_odd_window(1, 3, "block"),
            Err(ConfigError::KernelTooSmall {
                field: "block",
                value: 1,
                min: 3
            })
        );
    }

    #[test]
    fn test_validate_non_negative_f32() {
        let validator = TestValidator;
        assert!(validator.validate_non_negative_f32(0.0, "sigma").is_ok());
        assert!(validator.validate_non_negative_f32(1.5, "sigma").is_ok());
        assert!(validator.validate_non_negative_f32(-0.1, "sigma").is_err());
        assert!(validator.validate_non_negative_f32(f32::NAN, "sigma").is_err());
    }

    #[test]
    fn test_validate_positive_u32() {
        let validator = TestValidator;
        assert!(validator.validate_positive_u32(64, "target_height").is_ok());
        assert!(validator.validate_positive_u32(0, "target_height").is_err());
    }

    #[test]
    fn test_wrap_into_ocr_error() {
        struct Broken;
        impl ConfigValidator for Broken {
            fn validate(&self) -> Result<(), ConfigError> {
                Err(ConfigError::InvalidConfig {
                    message: "broken".to_string(),
                })
            }

            fn get_defaults() -> Self {
                Broken
            }
        }

        let err = Broken.validate_and_wrap_ocr_error().err();
        assert!(matches!(
            err,
            Some(crate::core::errors::OCRError::Config(_))
        ));
    }
}
