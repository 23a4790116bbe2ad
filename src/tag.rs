//! ASN.1 identifier octets: class and tag number.

/// The class bits of an identifier octet.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Class {
    Universal = 0,
    Application,
    Context,
    Private,
}

impl Class {
    /// Instantiate a `Class` from a u8.
    ///
    /// # Panics
    /// If `value` is greater than 3.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::Context,
            3 => Class::Private,
            num => panic!("'{}' is not a valid class.", num),
        }
    }

    pub fn is_universal(self) -> bool {
        self == Class::Universal
    }
}

/// An abstract representation of the tag octets used in BER/DER to identify
/// a value's type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Tag {
    pub class: Class,
    pub value: u32,
}

macro_rules! consts {
    ($($name:ident = $value:expr),+ $(,)?) => {
        impl Tag {
            $(
                pub const $name: Tag = Tag::new(Class::Universal, $value);
            )+
        }
    }
}

consts! {
    BOOL = 1,
    INTEGER = 2,
    BIT_STRING = 3,
    OCTET_STRING = 4,
    OBJECT_IDENTIFIER = 6,
    ENUMERATED = 10,
    UTC_TIME = 23,
    GENERALIZED_TIME = 24,
}

impl Tag {
    pub const fn new(class: Class, value: u32) -> Self {
        Self { class, value }
    }

    /// A context-class tag, the form CHOICE alternatives usually carry.
    pub const fn context(value: u32) -> Self {
        Self::new(Class::Context, value)
    }

    pub const fn is_universal(&self) -> bool {
        matches!(self.class, Class::Universal)
    }
}
