//! XML-RPC document encoding and decoding

use crate::{Fault, MethodCall, MethodResponse, ProtocolError, Result, Struct, Value};
use base64::Engine;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

/// Codec for XML-RPC method calls and responses
pub struct XmlRpcCodec;

impl XmlRpcCodec {
    /// Encode a method call
    ///
    /// Document format:
    /// ```text
    /// <?xml version="1.0"?>
    /// <methodCall>
    ///   <methodName>NAME</methodName>
    ///   <params><param><value>...</value></param>...</params>
    /// </methodCall>
    /// ```
    pub fn encode_call(call: &MethodCall) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        write_declaration(&mut writer)?;

        start(&mut writer, "methodCall")?;
        text_element(&mut writer, "methodName", &call.method_name)?;
        write_params(&mut writer, &call.params)?;
        end(&mut writer, "methodCall")?;

        Ok(writer.into_inner())
    }

    /// Encode a method response (success or fault)
    pub fn encode_response(response: &MethodResponse) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        write_declaration(&mut writer)?;

        start(&mut writer, "methodResponse")?;
        match response {
            MethodResponse::Success(value) => {
                write_params(&mut writer, std::slice::from_ref(value))?;
            }
            MethodResponse::Fault(fault) => {
                let mut members = Struct::new();
                members.insert("faultCode".to_string(), fault.code.clone());
                members.insert(
                    "faultString".to_string(),
                    Value::String(fault.message.clone()),
                );

                start(&mut writer, "fault")?;
                write_value(&mut writer, &Value::Struct(members))?;
                end(&mut writer, "fault")?;
            }
        }
        end(&mut writer, "methodResponse")?;

        Ok(writer.into_inner())
    }

    /// Decode a method call
    pub fn decode_call(input: &[u8]) -> Result<MethodCall> {
        let root = parse_document(input)?;
        root.expect_name("methodCall")?;

        let method_name = root.child("methodName")?.text.trim().to_string();
        if method_name.is_empty() {
            return Err(ProtocolError::InvalidFormat("Empty methodName".to_string()));
        }

        let params = match root.find("params") {
            Some(params) => decode_params(params)?,
            None => Vec::new(),
        };

        Ok(MethodCall {
            method_name,
            params,
        })
    }

    /// Decode a method response
    pub fn decode_response(input: &[u8]) -> Result<MethodResponse> {
        let root = parse_document(input)?;
        root.expect_name("methodResponse")?;

        if let Some(fault) = root.find("fault") {
            let mut members = decode_value(fault.child("value")?)?.into_struct()?;
            let code = members.remove("faultCode").unwrap_or(Value::Nil);
            let message = match members.remove("faultString") {
                Some(Value::String(message)) => message,
                Some(other) => other.to_string(),
                None => String::new(),
            };
            return Ok(MethodResponse::Fault(Fault { code, message }));
        }

        let mut params = decode_params(root.child("params")?)?;
        if params.len() != 1 {
            return Err(ProtocolError::InvalidFormat(format!(
                "Expected exactly one response param, got {}",
                params.len()
            )));
        }

        Ok(MethodResponse::Success(params.remove(0)))
    }
}

fn xml_err(err: impl Display) -> ProtocolError {
    ProtocolError::Xml(err.to_string())
}

// ==================== Encoding ====================

fn write_declaration(writer: &mut Writer<Vec<u8>>) -> Result<()> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .map_err(xml_err)
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    start(writer, name)?;
    if !text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)?;
    }
    end(writer, name)
}

fn write_params(writer: &mut Writer<Vec<u8>>, params: &[Value]) -> Result<()> {
    start(writer, "params")?;
    for param in params {
        start(writer, "param")?;
        write_value(writer, param)?;
        end(writer, "param")?;
    }
    end(writer, "params")
}

fn write_value(writer: &mut Writer<Vec<u8>>, value: &Value) -> Result<()> {
    start(writer, "value")?;

    match value {
        Value::Nil => {
            writer
                .write_event(Event::Empty(BytesStart::new("nil")))
                .map_err(xml_err)?;
        }
        Value::Bool(b) => {
            text_element(writer, "boolean", if *b { "1" } else { "0" })?;
        }
        Value::Int(i) => {
            // <int> is 32-bit on the wire
            let tag = if i32::try_from(*i).is_ok() { "int" } else { "i8" };
            text_element(writer, tag, &i.to_string())?;
        }
        Value::Double(d) => {
            // No wire form for NaN or infinities
            if !d.is_finite() {
                return Err(invalid_scalar("double", &d.to_string()));
            }
            text_element(writer, "double", &d.to_string())?;
        }
        Value::String(s) => text_element(writer, "string", s)?,
        Value::DateTime(s) => text_element(writer, "dateTime.iso8601", s)?,
        Value::Base64(bytes) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            text_element(writer, "base64", &encoded)?;
        }
        Value::Array(items) => {
            start(writer, "array")?;
            start(writer, "data")?;
            for item in items {
                write_value(writer, item)?;
            }
            end(writer, "data")?;
            end(writer, "array")?;
        }
        Value::Struct(members) => {
            start(writer, "struct")?;
            for (name, member) in members {
                start(writer, "member")?;
                text_element(writer, "name", name)?;
                write_value(writer, member)?;
                end(writer, "member")?;
            }
            end(writer, "struct")?;
        }
    }

    end(writer, "value")
}

// ==================== Decoding ====================

/// Minimal element tree built from reader events
#[derive(Debug, Default)]
struct Element {
    name: String,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    fn expect_name(&self, name: &str) -> Result<()> {
        if self.name == name {
            Ok(())
        } else {
            Err(ProtocolError::InvalidFormat(format!(
                "Expected <{}>, found <{}>",
                name, self.name
            )))
        }
    }

    fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    fn child(&self, name: &str) -> Result<&Element> {
        self.find(name).ok_or_else(|| {
            ProtocolError::InvalidFormat(format!("Missing <{}> in <{}>", name, self.name))
        })
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

fn parse_document(input: &[u8]) -> Result<Element> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(tag) => {
                let name = String::from_utf8_lossy(tag.local_name().as_ref()).into_owned();
                stack.push(Element::new(name));
            }
            Event::Empty(tag) => {
                let name = String::from_utf8_lossy(tag.local_name().as_ref()).into_owned();
                attach(&mut stack, &mut root, Element::new(name))?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    ProtocolError::InvalidFormat("Unbalanced closing tag".to_string())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape().map_err(xml_err)?);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ProtocolError::InvalidFormat(
            "Unexpected end of document".to_string(),
        ));
    }

    root.ok_or_else(|| ProtocolError::InvalidFormat("Empty document".to_string()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(ProtocolError::InvalidFormat(
            "Multiple root elements".to_string(),
        ))
    }
}

fn decode_params(params: &Element) -> Result<Vec<Value>> {
    params
        .children_named("param")
        .map(|param| decode_value(param.child("value")?))
        .collect()
}

fn decode_value(element: &Element) -> Result<Value> {
    element.expect_name("value")?;

    match element.children.as_slice() {
        // Untyped values are strings, whitespace included
        [] => Ok(Value::String(element.text.clone())),
        [typed] => decode_typed(typed),
        _ => Err(ProtocolError::InvalidFormat(
            "<value> holds more than one element".to_string(),
        )),
    }
}

fn decode_typed(element: &Element) -> Result<Value> {
    let text = element.text.trim();

    match element.name.as_str() {
        "int" | "i4" | "i8" | "i1" | "i2" | "biginteger" => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid_scalar("int", text)),
        "boolean" => match text {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            _ => Err(invalid_scalar("boolean", text)),
        },
        "double" => text
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| invalid_scalar("double", text)),
        "string" => Ok(Value::String(element.text.clone())),
        "dateTime.iso8601" => Ok(Value::DateTime(text.to_string())),
        "base64" => {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact.as_bytes())
                .map(Value::Base64)
                .map_err(|_| invalid_scalar("base64", text))
        }
        "nil" => Ok(Value::Nil),
        "array" => {
            let data = element.child("data")?;
            data.children_named("value")
                .map(decode_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut members = Struct::new();
            for member in element.children_named("member") {
                let name = member.child("name")?.text.clone();
                let value = decode_value(member.child("value")?)?;
                members.insert(name, value);
            }
            Ok(Value::Struct(members))
        }
        other => Err(ProtocolError::UnknownType(other.to_string())),
    }
}

fn invalid_scalar(kind: &'static str, text: &str) -> ProtocolError {
    ProtocolError::InvalidScalar {
        kind,
        text: text.to_string(),
    }
}
