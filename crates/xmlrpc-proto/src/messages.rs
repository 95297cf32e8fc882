//! Method call and response definitions

use crate::Value;
use std::fmt;

/// A `<methodCall>` document
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Remote method name (e.g. "authenticate", "execute_kw")
    pub method_name: String,

    /// Positional parameters
    pub params: Vec<Value>,
}

impl MethodCall {
    /// Create a new method call
    pub fn new(method_name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method_name: method_name.into(),
            params,
        }
    }
}

/// Remote fault returned in place of a result
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    /// Fault code. Usually an int, though Odoo sometimes sends a string
    pub code: Value,

    /// Human-readable fault string (often a server traceback)
    pub message: String,
}

impl Fault {
    pub fn new(code: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault {}: {}", self.code, self.message)
    }
}

/// A `<methodResponse>` document
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    /// Single return value
    Success(Value),

    /// Remote fault
    Fault(Fault),
}

impl MethodResponse {
    /// Convert into a plain result
    pub fn into_result(self) -> std::result::Result<Value, Fault> {
        match self {
            MethodResponse::Success(value) => Ok(value),
            MethodResponse::Fault(fault) => Err(fault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_display() {
        let fault = Fault::new(2, "Access Denied");
        assert_eq!(fault.to_string(), "fault 2: Access Denied");
    }

    #[test]
    fn test_into_result() {
        let ok = MethodResponse::Success(Value::Int(7));
        assert_eq!(ok.into_result().unwrap(), Value::Int(7));

        let err = MethodResponse::Fault(Fault::new("warning", "Record does not exist"));
        let fault = err.into_result().unwrap_err();
        assert_eq!(fault.code, Value::String("warning".to_string()));
    }
}
