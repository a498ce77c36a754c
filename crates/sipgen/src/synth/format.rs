use crate::header::{MethodDescriptor, ParameterDescriptor};

/// SIP annotation handing ownership of the new object to the argument.
pub const TRANSFER_THIS: &str = "/TransferThis/";

/// Constructor parameters whose name contains `parent` in any case get
/// [`TRANSFER_THIS`]. This also matches names like `transparentColor`.
pub fn transfers_ownership(name: &str) -> bool {
    name.to_lowercase().contains("parent")
}

/// One SIP method line, indented and terminated: `  virtual int f(int a) const;\n`.
pub fn method_line(method: &MethodDescriptor) -> String {
    let mut line = String::from("  ");
    if method.is_virtual {
        line.push_str("virtual ");
    }
    if method.is_explicit {
        line.push_str("explicit ");
    }
    if !(method.is_constructor || method.is_destructor) {
        let return_type = method.return_type.replace("inline ", "");
        line.push_str(&return_type);
        if !return_type.is_empty() && !return_type.ends_with('*') {
            line.push(' ');
        }
    }
    if method.is_destructor {
        line.push('~');
    }
    line.push_str(&method.name);
    line.push('(');
    let parameters: Vec<String> = method
        .parameters
        .iter()
        .map(|param| parameter(param, method.is_constructor))
        .collect();
    line.push_str(&parameters.join(", "));
    line.push(')');
    if method.is_const {
        line.push_str(" const");
    }
    line.push_str(";\n");
    line
}

pub fn parameter(
    param: &ParameterDescriptor,
    in_constructor: bool,
) -> String {
    let mut text = String::new();
    if param.is_const {
        text.push_str("const ");
    }
    text.push_str(param.raw_type.strip_prefix("::").unwrap_or(&param.raw_type));

    let name = param.name.as_deref().unwrap_or_default();
    if param.is_pointer {
        text.push_str(" *");
    } else if param.is_reference {
        text.push_str(" &");
    } else {
        text.push(' ');
    }
    text.push_str(name);

    if in_constructor && transfers_ownership(name) {
        text.push(' ');
        text.push_str(TRANSFER_THIS);
    }
    if let Some(default) = &param.default_value {
        text.push_str(" = ");
        text.push_str(default);
    }
    text
}

/// Undo the `: :` spacing left around scope operators, keeping `Qt::` intact.
pub fn normalize_scopes(text: &str) -> String {
    text.replace("Qt : : ", "Qt::").replace(" : : ", "::")
}

#[cfg(test)]
#[path = "../../tests/src/synth/format_tests.rs"]
mod tests;
