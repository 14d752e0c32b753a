use std::{
    io::{Cursor, Read},
    marker::PhantomData,
};

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace};

use crate::{
    access_flags::AccessFlagSet,
    attributes::{Attribute, Attributes, CodeAttribute, ExceptionTableEntry},
    class_file::{FieldInfo, MemberInfo, MethodInfo},
    constant_pool::{
        ClassInfo, CpInfo, InvokeDynamicInfo, MethodHandleInfo, MethodTypeInfo, NameAndTypeInfo,
        RefInfo, StringInfo,
    },
    ClassFile, ClassFileError, ConstantPool, Result,
};

type Endian = BigEndian;

const MAGIC: u32 = 0xCAFEBABE;

/// Sequential decoder over an in-memory class file.
pub struct Parser<'a> {
    r: Cursor<&'a [u8]>,
}
impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            r: Cursor::new(buf),
        }
    }

    pub fn parse(&mut self) -> Result<ClassFile> {
        let size = self.r.get_ref().len();
        let magic = self.parse_magic_identifier()?;
        let (major_version, minor_version) = self.parse_version()?;
        debug!("class file version {}.{}", major_version, minor_version);

        let constant_pool = self.parse_constant_pool()?;
        debug!("constant pool with {} slots", constant_pool.count());

        let access_flags = self.read_u16()?;
        let this_class = self.read_u16()?;
        let super_class = self.read_u16()?;
        let interfaces_count = self.read_u16()?;

        let mut interfaces = vec![0u16; interfaces_count as usize];
        self.r.read_u16_into::<Endian>(&mut interfaces)?;

        let fields: Vec<FieldInfo> = self.parse_members(&constant_pool)?;
        debug!("{} fields", fields.len());

        let methods: Vec<MethodInfo> = self.parse_members(&constant_pool)?;
        debug!("{} methods", methods.len());

        let attributes = self.parse_attributes(&constant_pool)?;
        debug!("{} attributes", attributes.len());

        Ok(ClassFile {
            size,
            magic,
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn parse_magic_identifier(&mut self) -> Result<u32> {
        match self.read_u32()? {
            MAGIC => Ok(MAGIC),
            magic_identifier => Err(ClassFileError::InvalidMagic(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.read_u16()?;
        let major = self.read_u16()?;
        Ok((major, minor))
    }

    fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.read_u16()?;

        let mut res = Vec::with_capacity((constant_pool_count as usize).saturating_sub(1));
        let mut index = 1;
        while index < constant_pool_count {
            let cp_info = self.parse_cp_info(index)?;
            trace!("#{} = {:?}", index, cp_info);

            let slot_size = cp_info.slot_size();
            res.push(cp_info);
            if slot_size == 2 && index + 1 < constant_pool_count {
                res.push(CpInfo::Unusable);
            }

            index = index.saturating_add(slot_size);
        }
        Ok(ConstantPool::new(res))
    }

    fn parse_cp_info(&mut self, index: u16) -> Result<CpInfo> {
        let tag = self.read_u8()?;
        match tag {
            1 => self.parse_utf8(index),
            3 => self.parse_integer(),
            4 => self.parse_float(),
            5 => self.parse_long(),
            6 => self.parse_double(),
            7 => self.parse_class_info(),
            8 => self.parse_string(),
            9 => Ok(CpInfo::FieldRef(self.parse_ref_info()?)),
            10 => Ok(CpInfo::MethodRef(self.parse_ref_info()?)),
            11 => Ok(CpInfo::InterfaceMethodRef(self.parse_ref_info()?)),
            12 => self.parse_name_and_type_info(),
            15 => self.parse_method_handle(),
            16 => self.parse_method_type_info(),
            18 => self.parse_invoke_dynamic_info(),
            _ => Err(ClassFileError::InvalidConstantTag(tag)),
        }
    }

    fn parse_utf8(&mut self, index: u16) -> Result<CpInfo> {
        let length = self.read_u16()?;
        let bytes = self.read_bytes(length as usize)?;

        // Modified UTF-8: two byte NUL and surrogate pairs, see JVMS 4.4.7.
        cesu8::from_java_cesu8(&bytes)
            .map(|s| CpInfo::Utf8(s.into_owned()))
            .map_err(|_| ClassFileError::InvalidUtf8(index))
    }

    fn parse_integer(&mut self) -> Result<CpInfo> {
        Ok(CpInfo::Integer(self.read_i32()?))
    }

    // IEEE 754 single format bit layout, so infinities and NaN need no special handling.
    fn parse_float(&mut self) -> Result<CpInfo> {
        Ok(CpInfo::Float(f32::from_bits(self.read_u32()?)))
    }

    fn parse_long(&mut self) -> Result<CpInfo> {
        Ok(CpInfo::Long(self.read_high_low()? as i64))
    }

    fn parse_double(&mut self) -> Result<CpInfo> {
        Ok(CpInfo::Double(f64::from_bits(self.read_high_low()?)))
    }

    fn parse_class_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_u16()?;

        Ok(CpInfo::Class(ClassInfo { name_index }))
    }

    fn parse_string(&mut self) -> Result<CpInfo> {
        let string_index = self.read_u16()?;

        Ok(CpInfo::String(StringInfo { string_index }))
    }

    fn parse_name_and_type_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;

        Ok(CpInfo::NameAndType(NameAndTypeInfo {
            name_index,
            descriptor_index,
        }))
    }

    fn parse_method_handle(&mut self) -> Result<CpInfo> {
        let reference_kind = self.read_u8()?;
        let reference_index = self.read_u16()?;

        Ok(CpInfo::MethodHandle(MethodHandleInfo {
            reference_kind,
            reference_index,
        }))
    }

    fn parse_method_type_info(&mut self) -> Result<CpInfo> {
        let descriptor_index = self.read_u16()?;

        Ok(CpInfo::MethodType(MethodTypeInfo { descriptor_index }))
    }

    fn parse_invoke_dynamic_info(&mut self) -> Result<CpInfo> {
        let bootstrap_method_attr_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(CpInfo::InvokeDynamic(InvokeDynamicInfo {
            bootstrap_method_attr_index,
            name_and_type_index,
        }))
    }

    fn parse_ref_info(&mut self) -> Result<RefInfo> {
        let class_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(RefInfo {
            class_index,
            name_and_type_index,
        })
    }

    /// Reads `fields_count` or `methods_count` followed by that many member records.
    pub fn parse_members<F: AccessFlagSet>(
        &mut self,
        constant_pool: &ConstantPool,
    ) -> Result<Vec<MemberInfo<F>>> {
        let count = self.read_u16()?;
        (0..count)
            .map(|_| self.parse_member_info::<F>(constant_pool))
            .collect()
    }

    fn parse_member_info<F: AccessFlagSet>(
        &mut self,
        constant_pool: &ConstantPool,
    ) -> Result<MemberInfo<F>> {
        let access_flags = self.read_u16()?;
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        let attributes = self.parse_attributes(constant_pool)?;

        Ok(MemberInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
            flags: PhantomData,
        })
    }

    /// Reads `attributes_count` followed by that many attribute records.
    pub fn parse_attributes(&mut self, constant_pool: &ConstantPool) -> Result<Attributes> {
        let attributes_count = self.read_u16()?;
        (0..attributes_count)
            .map(|_| self.parse_attribute(constant_pool))
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }

    fn parse_attribute(&mut self, constant_pool: &ConstantPool) -> Result<Attribute> {
        let attribute_name_index = self.read_u16()?;
        let name = constant_pool.utf8(attribute_name_index)?.to_owned();
        let attribute_length = self.read_u32()?;
        let info = self.read_bytes(attribute_length as usize)?;

        Ok(Attribute {
            attribute_name_index,
            name,
            info,
        })
    }

    pub fn parse_code_attribute(&mut self, constant_pool: &ConstantPool) -> Result<CodeAttribute> {
        let max_stack = self.read_u16()?;
        let max_locals = self.read_u16()?;
        let code_length = self.read_u32()?;
        let code = self.read_bytes(code_length as usize)?;
        let exception_table_length = self.read_u16()?;
        let exception_table = (0..exception_table_length)
            .map(|_| self.parse_exception_table_entry())
            .collect::<Result<Vec<_>>>()?;
        let attributes = self.parse_attributes(constant_pool)?;

        Ok(CodeAttribute {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes,
        })
    }

    fn parse_exception_table_entry(&mut self) -> Result<ExceptionTableEntry> {
        let start_pc = self.read_u16()?;
        let end_pc = self.read_u16()?;
        let handler_pc = self.read_u16()?;
        let catch_type = self.read_u16()?;

        Ok(ExceptionTableEntry {
            start_pc,
            end_pc,
            handler_pc,
            catch_type,
        })
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.r.get_ref().len().saturating_sub(self.r.position() as usize)
    }

    fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        // Never allocate more than the buffer can still hold.
        if length > self.remaining() {
            return Err(ClassFileError::UnexpectedEof);
        }
        let mut bytes = vec![0u8; length];
        self.r.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn read_high_low(&mut self) -> Result<u64> {
        let high_bytes = self.read_u32()?;
        let low_bytes = self.read_u32()?;
        Ok((high_bytes as u64) << 32 | low_bytes as u64)
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(self.r.read_u32::<Endian>()?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(self.r.read_u16::<Endian>()?)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.r.read_u8()?)
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(self.r.read_i32::<Endian>()?)
    }
}




#[cfg(test)]
mod parse_constant_pool_tests {
    use super::*;

    #[test]
    fn it_should_leave_a_gap_after_a_long() {
        let pool = Parser::new(&[
            0x00, 0x04, // count
            0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, // #1 Long
            0x01, 0x00, 0x01, b'x', // #3 Utf8
        ])
        .parse_constant_pool()
        .unwrap();

        assert_eq!(pool.get(1).unwrap(), &CpInfo::Long(7));
        assert!(matches!(pool.get(2), Err(ClassFileError::InvalidIndex(2))));
        assert_eq!(pool.utf8(3).unwrap(), "x");
    }

    #[test]
    fn it_should_accept_an_empty_pool() {
        for count in [0u8, 1] {
            let pool = Parser::new(&[0x00, count])
                .parse_constant_pool()
                .unwrap();
            assert_eq!(pool.iter().count(), 0);
        }
    }

    #[test]
    fn it_should_not_reserve_past_the_last_slot() {
        let pool = Parser::new(&[
            0x00, 0x02, // count
            0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // #1 Double
        ])
        .parse_constant_pool()
        .unwrap();

        assert_eq!(pool.count(), 2);
        assert!(matches!(pool.get(2), Err(ClassFileError::InvalidIndex(2))));
    }
}
