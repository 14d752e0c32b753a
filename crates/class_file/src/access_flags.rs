// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html#jvms-4.1-200-E.1

use std::fmt;

use bitflags::bitflags;

/// Common surface of the class, field and method flag vocabularies.
pub trait AccessFlagSet: Copy + fmt::Debug + PartialEq {
    fn from_raw(bits: u16) -> Self;

    /// Names of the set flags, in declaration order.
    fn names(&self) -> Vec<&'static str>;
}

// Declares a bitflags type together with its name table. Names are emitted in the
// order the flags are listed here, never in bit order.
macro_rules! access_flags {
    ($(#[$meta:meta])* $name:ident { $($flag:ident = $value:expr => $text:literal,)+ }) => {
        bitflags! {
            $(#[$meta])*
            pub struct $name: u16 {
                $(const $flag = $value;)+
            }
        }

        impl $name {
            const NAMES: &'static [($name, &'static str)] = &[$(($name::$flag, $text),)+];

            pub fn names(&self) -> Vec<&'static str> {
                Self::NAMES
                    .iter()
                    .filter(|(flag, _)| self.contains(*flag))
                    .map(|(_, text)| *text)
                    .collect()
            }
        }

        impl AccessFlagSet for $name {
            fn from_raw(bits: u16) -> Self {
                Self::from_bits_truncate(bits)
            }

            fn names(&self) -> Vec<&'static str> {
                $name::names(self)
            }
        }
    };
}

access_flags! {
    /// Flags of the `access_flags` item of a ClassFile structure.
    ClassAccessFlags {
        PUBLIC = 0x0001 => "public",
        FINAL = 0x0010 => "final",
        SUPER = 0x0020 => "super",
        INTERFACE = 0x0200 => "interface",
        ABSTRACT = 0x0400 => "abstract",
        SYNTHETIC = 0x1000 => "synthetic",
        ANNOTATION = 0x2000 => "annotation",
        ENUM = 0x4000 => "enum",
    }
}

access_flags! {
    FieldAccessFlags {
        PUBLIC = 0x0001 => "public",
        PRIVATE = 0x0002 => "private",
        PROTECTED = 0x0004 => "protected",
        STATIC = 0x0008 => "static",
        FINAL = 0x0010 => "final",
        VOLATILE = 0x0040 => "volatile",
        TRANSIENT = 0x0080 => "transient",
        SYNTHETIC = 0x1000 => "synthetic",
        ENUM = 0x4000 => "enum",
    }
}

access_flags! {
    MethodAccessFlags {
        PUBLIC = 0x0001 => "public",
        PRIVATE = 0x0002 => "private",
        PROTECTED = 0x0004 => "protected",
        STATIC = 0x0008 => "static",
        FINAL = 0x0010 => "final",
        SYNCHRONIZED = 0x0020 => "synchronized",
        BRIDGE = 0x0040 => "bridge",
        VARARGS = 0x0080 => "varargs",
        NATIVE = 0x0100 => "native",
        ABSTRACT = 0x0400 => "abstract",
        STRICT = 0x0800 => "strict",
        SYNTHETIC = 0x1000 => "synthetic",
    }
}

#[cfg(test)]
mod access_flags_tests {
    use super::*;

    #[test]
    fn it_should_name_the_super_flag() {
        assert_eq!(ClassAccessFlags::from_raw(0x0020).names(), vec!["super"]);
    }

    #[test]
    fn it_should_use_declaration_order() {
        let flags = ClassAccessFlags::ENUM | ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL;
        assert_eq!(flags.names(), vec!["public", "final", "enum"]);
        assert_eq!(flags.names(), flags.names());
    }

    #[test]
    fn it_should_ignore_unknown_bits() {
        assert_eq!(
            ClassAccessFlags::from_raw(0x0001 | 0x8000).names(),
            ClassAccessFlags::from_raw(0x0001).names()
        );
    }

    #[test]
    fn it_should_produce_nothing_for_an_empty_mask() {
        assert!(MethodAccessFlags::from_raw(0).names().is_empty());
    }

    #[test]
    fn it_should_name_method_flags_sharing_class_bits() {
        assert_eq!(
            MethodAccessFlags::from_raw(0x0020 | 0x0008 | 0x0001).names(),
            vec!["public", "static", "synchronized"]
        );
        assert_eq!(
            FieldAccessFlags::from_raw(0x0040 | 0x0002).names(),
            vec!["private", "volatile"]
        );
    }
}
