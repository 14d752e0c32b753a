use std::fmt;

use crate::{parser::Parser, ConstantPool, Result};

#[derive(PartialEq, Clone)]
pub struct Attribute {
    pub attribute_name_index: u16,
    pub name: String,
    pub info: Vec<u8>,
}
impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("attribute_name_index", &self.attribute_name_index)
            .field("name", &self.name)
            .field("info", &format!("({} bytes)", self.info.len()))
            .finish()
    }
}

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Attributes(pub Vec<Attribute>);
impl Attributes {
    pub fn find_by_name(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes the `Code` attribute, if there is one.
    pub fn code_attribute(&self, constant_pool: &ConstantPool) -> Result<Option<CodeAttribute>> {
        let Some(code) = self.find_by_name("Code") else {
            return Ok(None);
        };

        Parser::new(&code.info)
            .parse_code_attribute(constant_pool)
            .map(Some)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Attributes,
}
