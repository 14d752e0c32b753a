// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html#jvms-4.4

use crate::{ClassFileError, Result};

// Resolves `$index` in `$cp` and unwraps the `CpInfo::$i` payload, or fails with a
// `TypeMismatch` naming the kind that was found instead.
macro_rules! matches_cp_info {
    ($cp:expr, $index:expr, $i:ident) => {{
        let index: u16 = $index;
        match $cp.get(index)? {
            crate::constant_pool::CpInfo::$i(ref n) => Ok(n),
            c => Err(crate::ClassFileError::TypeMismatch {
                index,
                expected: stringify!($i),
                found: c.kind(),
            }),
        }
    }};
}

/// The constant pool of a class file, addressed by the 1-based indices used in the file.
///
/// Slot `n` lives at `cp_infos[n - 1]`. The slot following a `Long` or `Double` holds
/// [`CpInfo::Unusable`] and can never be resolved.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct ConstantPool {
    cp_infos: Vec<CpInfo>,
}
impl ConstantPool {
    pub(crate) fn new(cp_infos: Vec<CpInfo>) -> Self {
        Self { cp_infos }
    }

    /// The `constant_pool_count` this pool was read with, i.e. the highest slot plus one.
    pub fn count(&self) -> usize {
        self.cp_infos.len() + 1
    }

    /// Returns the entry at `index`.
    ///
    /// Index 0, indices past the end and the slot shadowed by a `Long` or `Double` are
    /// all reported as [`ClassFileError::InvalidIndex`].
    pub fn get(&self, index: u16) -> Result<&CpInfo> {
        match index
            .checked_sub(1)
            .and_then(|i| self.cp_infos.get(i as usize))
        {
            None | Some(CpInfo::Unusable) => Err(ClassFileError::InvalidIndex(index)),
            Some(cp_info) => Ok(cp_info),
        }
    }

    /// Occupied slots with their indices, in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &CpInfo)> {
        self.cp_infos
            .iter()
            .enumerate()
            .filter(|(_, cp_info)| !matches!(cp_info, CpInfo::Unusable))
            .map(|(i, cp_info)| (i as u16 + 1, cp_info))
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        matches_cp_info!(self, index, Utf8).map(String::as_str)
    }

    /// Resolves a `CONSTANT_Class_info` to the class name in internal form.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        let ClassInfo { name_index } = matches_cp_info!(self, index, Class)?;

        self.utf8(*name_index)
    }

    /// Resolves a `CONSTANT_NameAndType_info` to its `(name, descriptor)` pair.
    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str)> {
        let NameAndTypeInfo {
            name_index,
            descriptor_index,
        } = matches_cp_info!(self, index, NameAndType)?;

        Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?))
    }

    pub fn string(&self, index: u16) -> Result<&str> {
        let StringInfo { string_index } = matches_cp_info!(self, index, String)?;

        self.utf8(*string_index)
    }

    pub fn method_type(&self, index: u16) -> Result<&str> {
        let MethodTypeInfo { descriptor_index } = matches_cp_info!(self, index, MethodType)?;

        self.utf8(*descriptor_index)
    }

    /// Resolves a field, method or interface method reference.
    pub fn member_ref(&self, index: u16) -> Result<MemberRef<'_>> {
        let RefInfo {
            class_index,
            name_and_type_index,
        } = match self.get(index)? {
            CpInfo::FieldRef(ref_info)
            | CpInfo::MethodRef(ref_info)
            | CpInfo::InterfaceMethodRef(ref_info) => ref_info,
            c => {
                return Err(ClassFileError::TypeMismatch {
                    index,
                    expected: "FieldRef, MethodRef or InterfaceMethodRef",
                    found: c.kind(),
                })
            }
        };

        let class_name = self.class_name(*class_index)?;
        let (name, descriptor) = self.name_and_type(*name_and_type_index)?;

        Ok(MemberRef {
            class_name,
            name,
            descriptor,
        })
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MemberRef<'a> {
    pub class_name: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
}

#[derive(Debug, Clone)]
pub enum CpInfo {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(ClassInfo),
    String(StringInfo),
    FieldRef(RefInfo),
    MethodRef(RefInfo),
    InterfaceMethodRef(RefInfo),
    NameAndType(NameAndTypeInfo),
    MethodHandle(MethodHandleInfo),
    MethodType(MethodTypeInfo),
    InvokeDynamic(InvokeDynamicInfo),
    Unusable,
}
// Floats compare by bit pattern so that a decoded NaN equals itself.
impl PartialEq for CpInfo {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CpInfo::Utf8(a), CpInfo::Utf8(b)) => a == b,
            (CpInfo::Integer(a), CpInfo::Integer(b)) => a == b,
            (CpInfo::Float(a), CpInfo::Float(b)) => a.to_bits() == b.to_bits(),
            (CpInfo::Long(a), CpInfo::Long(b)) => a == b,
            (CpInfo::Double(a), CpInfo::Double(b)) => a.to_bits() == b.to_bits(),
            (CpInfo::Class(a), CpInfo::Class(b)) => a == b,
            (CpInfo::String(a), CpInfo::String(b)) => a == b,
            (CpInfo::FieldRef(a), CpInfo::FieldRef(b)) => a == b,
            (CpInfo::MethodRef(a), CpInfo::MethodRef(b)) => a == b,
            (CpInfo::InterfaceMethodRef(a), CpInfo::InterfaceMethodRef(b)) => a == b,
            (CpInfo::NameAndType(a), CpInfo::NameAndType(b)) => a == b,
            (CpInfo::MethodHandle(a), CpInfo::MethodHandle(b)) => a == b,
            (CpInfo::MethodType(a), CpInfo::MethodType(b)) => a == b,
            (CpInfo::InvokeDynamic(a), CpInfo::InvokeDynamic(b)) => a == b,
            (CpInfo::Unusable, CpInfo::Unusable) => true,
            _ => false,
        }
    }
}

impl CpInfo {
    pub fn kind(&self) -> &'static str {
        match self {
            CpInfo::Utf8(_) => "Utf8",
            CpInfo::Integer(_) => "Integer",
            CpInfo::Float(_) => "Float",
            CpInfo::Long(_) => "Long",
            CpInfo::Double(_) => "Double",
            CpInfo::Class(_) => "Class",
            CpInfo::String(_) => "String",
            CpInfo::FieldRef(_) => "FieldRef",
            CpInfo::MethodRef(_) => "MethodRef",
            CpInfo::InterfaceMethodRef(_) => "InterfaceMethodRef",
            CpInfo::NameAndType(_) => "NameAndType",
            CpInfo::MethodHandle(_) => "MethodHandle",
            CpInfo::MethodType(_) => "MethodType",
            CpInfo::InvokeDynamic(_) => "InvokeDynamic",
            CpInfo::Unusable => "Unusable",
        }
    }

    /// Number of pool slots the entry occupies.
    pub fn slot_size(&self) -> u16 {
        match self {
            CpInfo::Long(_) | CpInfo::Double(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassInfo {
    // The constant_pool entry at name_index must be a CONSTANT_Utf8_info structure
    // representing a valid binary class or interface name encoded in internal form.
    pub name_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct StringInfo {
    pub string_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RefInfo {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NameAndTypeInfo {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodHandleInfo {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodTypeInfo {
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvokeDynamicInfo {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}
