use std::marker::PhantomData;

use crate::{
    access_flags::{AccessFlagSet, ClassAccessFlags, FieldAccessFlags, MethodAccessFlags},
    attributes::{Attributes, CodeAttribute},
    parser::Parser,
    ConstantPool, Result,
};

/// A decoded class file. Every index it holds refers to its own `constant_pool`.
#[derive(Debug, PartialEq, Clone)]
pub struct ClassFile {
    /// Length in bytes of the buffer the class was decoded from.
    pub size: usize,
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    /// The `access_flags` item as read, undefined bits included.
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Attributes,
}
impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<ClassFile> {
        Parser::new(bytes).parse()
    }

    pub fn access_flags(&self) -> ClassAccessFlags {
        ClassAccessFlags::from_raw(self.access_flags)
    }

    pub fn class_name(&self) -> Result<&str> {
        // The constant_pool entry at this_class must be a CONSTANT_Class_info structure
        // representing the class or interface defined by this class file.
        self.constant_pool.class_name(self.this_class)
    }

    pub fn super_class(&self) -> Result<Option<&str>> {
        // If the value of the super_class item is zero, then this class file must represent
        // the class Object, the only class or interface without a direct superclass.
        if self.super_class == 0 {
            return Ok(None);
        }

        self.constant_pool.class_name(self.super_class).map(Some)
    }

    pub fn interfaces(&self) -> Result<Vec<&str>> {
        self.interfaces
            .iter()
            .map(|&index| self.constant_pool.class_name(index))
            .collect()
    }

    pub fn field_name(&self, field: &FieldInfo) -> Result<&str> {
        field.name(&self.constant_pool)
    }

    pub fn field_descriptor(&self, field: &FieldInfo) -> Result<&str> {
        field.descriptor(&self.constant_pool)
    }

    pub fn method_name(&self, method: &MethodInfo) -> Result<&str> {
        method.name(&self.constant_pool)
    }

    pub fn method_descriptor(&self, method: &MethodInfo) -> Result<&str> {
        method.descriptor(&self.constant_pool)
    }

    pub fn method_code(&self, method: &MethodInfo) -> Result<Option<CodeAttribute>> {
        method.attributes.code_attribute(&self.constant_pool)
    }
}

/// A `field_info` or `method_info` structure; both share one layout.
#[derive(Debug, PartialEq, Clone)]
pub struct MemberInfo<F: AccessFlagSet> {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
    pub(crate) flags: PhantomData<F>,
}
impl<F: AccessFlagSet> MemberInfo<F> {
    pub fn access_flags(&self) -> F {
        F::from_raw(self.access_flags)
    }

    pub fn name<'a>(&self, constant_pool: &'a ConstantPool) -> Result<&'a str> {
        constant_pool.utf8(self.name_index)
    }

    pub fn descriptor<'a>(&self, constant_pool: &'a ConstantPool) -> Result<&'a str> {
        constant_pool.utf8(self.descriptor_index)
    }
}

pub type FieldInfo = MemberInfo<FieldAccessFlags>;
pub type MethodInfo = MemberInfo<MethodAccessFlags>;
