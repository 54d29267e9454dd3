// Binary codec shared by the node, the contracts and the client bindings.
//
// Integers are little-endian and fixed width. Byte vectors, strings and
// sequences are prefixed with their length as a u32. Options carry a one
// byte tag (0 = None, 1 = Some).

mod reader;
mod writer;

pub use reader::{Reader, ReaderError};
pub use writer::Writer;

/// Upper bound for any length-prefixed value read from untrusted input
pub const MAX_BYTES_SIZE: usize = 64 * 1024;

/// Upper bound for the element count of a sequence
pub const MAX_ARRAY_SIZE: usize = 1024;

pub trait Serializer {
    fn write(&self, writer: &mut Writer);

    fn read(reader: &mut Reader) -> Result<Self, ReaderError>
    where
        Self: Sized;

    fn size(&self) -> usize {
        let mut writer = Writer::new();
        self.write(&mut writer);
        writer.total_write()
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.write(&mut writer);
        writer.bytes()
    }

    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decode a value and require that every byte has been consumed
    fn from_bytes(bytes: &[u8]) -> Result<Self, ReaderError>
    where
        Self: Sized,
    {
        let mut reader = Reader::new(bytes);
        let value = Self::read(&mut reader)?;
        if reader.size() != 0 {
            return Err(ReaderError::InvalidSize);
        }
        Ok(value)
    }

    fn from_hex(hex: &str) -> Result<Self, ReaderError>
    where
        Self: Sized,
    {
        let bytes = hex::decode(hex).map_err(|_| ReaderError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }
}

impl Serializer for () {
    fn write(&self, _: &mut Writer) {}

    fn read(_: &mut Reader) -> Result<Self, ReaderError> {
        Ok(())
    }

    fn size(&self) -> usize {
        0
    }
}

impl Serializer for bool {
    fn write(&self, writer: &mut Writer) {
        writer.write_bool(*self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bool()
    }

    fn size(&self) -> usize {
        1
    }
}

macro_rules! impl_serializer_for_int {
    ($($t:ty => $write:ident, $read:ident);* $(;)?) => {
        $(
            impl Serializer for $t {
                fn write(&self, writer: &mut Writer) {
                    writer.$write(*self);
                }

                fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
                    reader.$read()
                }

                fn size(&self) -> usize {
                    std::mem::size_of::<$t>()
                }
            }
        )*
    };
}

impl_serializer_for_int! {
    u8 => write_u8, read_u8;
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    u128 => write_u128, read_u128;
}

impl<const N: usize> Serializer for [u8; N] {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bytes(N)
    }

    fn size(&self) -> usize {
        N
    }
}

impl Serializer for String {
    fn write(&self, writer: &mut Writer) {
        writer.write_string(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_string()
    }

    fn size(&self) -> usize {
        4 + self.len()
    }
}

impl<T: Serializer> Serializer for Option<T> {
    fn write(&self, writer: &mut Writer) {
        match self {
            Some(value) => {
                writer.write_bool(true);
                value.write(writer);
            }
            None => writer.write_bool(false),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        if reader.read_bool()? {
            Ok(Some(T::read(reader)?))
        } else {
            Ok(None)
        }
    }

    fn size(&self) -> usize {
        1 + self.as_ref().map(Serializer::size).unwrap_or(0)
    }
}

// Vec<u8> is encoded as a single length-prefixed blob, every other
// element type goes through the generic sequence encoding below.
impl Serializer for Vec<u8> {
    fn write(&self, writer: &mut Writer) {
        writer.write_blob(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_blob()
    }

    fn size(&self) -> usize {
        4 + self.len()
    }
}

/// Write a length-prefixed sequence of serializable values
pub fn write_sequence<T: Serializer>(writer: &mut Writer, values: &[T]) {
    writer.write_u32(values.len() as u32);
    for value in values {
        value.write(writer);
    }
}

/// Read a length-prefixed sequence of serializable values
pub fn read_sequence<T: Serializer>(reader: &mut Reader) -> Result<Vec<T>, ReaderError> {
    let len = reader.read_u32()? as usize;
    if len > MAX_ARRAY_SIZE {
        return Err(ReaderError::ExceedsMaxArraySize);
    }

    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        values.push(T::read(reader)?);
    }
    Ok(values)
}

impl<A: Serializer, B: Serializer> Serializer for (A, B) {
    fn write(&self, writer: &mut Writer) {
        self.0.write(writer);
        self.1.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok((A::read(reader)?, B::read(reader)?))
    }

    fn size(&self) -> usize {
        self.0.size() + self.1.size()
    }
}

impl<A: Serializer, B: Serializer, C: Serializer> Serializer for (A, B, C) {
    fn write(&self, writer: &mut Writer) {
        self.0.write(writer);
        self.1.write(writer);
        self.2.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok((A::read(reader)?, B::read(reader)?, C::read(reader)?))
    }

    fn size(&self) -> usize {
        self.0.size() + self.1.size() + self.2.size()
    }
}

impl<A: Serializer, B: Serializer, C: Serializer, D: Serializer> Serializer for (A, B, C, D) {
    fn write(&self, writer: &mut Writer) {
        self.0.write(writer);
        self.1.write(writer);
        self.2.write(writer);
        self.3.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok((
            A::read(reader)?,
            B::read(reader)?,
            C::read(reader)?,
            D::read(reader)?,
        ))
    }

    fn size(&self) -> usize {
        self.0.size() + self.1.size() + self.2.size() + self.3.size()
    }
}

impl<T: Serializer, E: Serializer> Serializer for Result<T, E> {
    fn write(&self, writer: &mut Writer) {
        match self {
            Ok(value) => {
                writer.write_u8(0);
                value.write(writer);
            }
            Err(err) => {
                writer.write_u8(1);
                err.write(writer);
            }
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        match reader.read_u8()? {
            0 => Ok(Ok(T::read(reader)?)),
            1 => Ok(Err(E::read(reader)?)),
            _ => Err(ReaderError::InvalidValue),
        }
    }
}
