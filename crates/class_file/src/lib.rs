// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html

mod access_flags;
pub mod attributes;
mod class_file;
mod constant_pool;
mod error;
mod parser;

pub use self::class_file::{ClassFile, FieldInfo, MemberInfo, MethodInfo};
pub use access_flags::{AccessFlagSet, ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
pub use constant_pool::{
    ClassInfo, ConstantPool, CpInfo, InvokeDynamicInfo, MemberRef, MethodHandleInfo,
    MethodTypeInfo, NameAndTypeInfo, RefInfo, StringInfo,
};
pub use error::ClassFileError;
pub use parser::Parser;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;
