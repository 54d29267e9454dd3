// Typed storage cells over the raw key/value host storage.
//
// A Mapping stores each entry under `prefix ++ encode(key)`, a Lazy stores a
// single value under its prefix.

use std::marker::PhantomData;

use showgame_common::serializer::{Serializer, Writer};

use crate::{env::Environment, error::ExecError};

pub struct Mapping<K, V> {
    prefix: &'static [u8],
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K: Serializer, V: Serializer> Mapping<K, V> {
    pub const fn new(prefix: &'static [u8]) -> Self {
        Self {
            prefix,
            _marker: PhantomData,
        }
    }

    pub fn key(&self, key: &K) -> Vec<u8> {
        let mut writer = Writer::with_capacity(self.prefix.len() + key.size());
        writer.write_bytes(self.prefix);
        key.write(&mut writer);
        writer.bytes()
    }

    pub fn get(&self, env: &mut dyn Environment, key: &K) -> Result<Option<V>, ExecError> {
        match env.get_storage(&self.key(key))? {
            Some(bytes) => V::from_bytes(&bytes)
                .map(Some)
                .map_err(ExecError::CorruptedStorage),
            None => Ok(None),
        }
    }

    pub fn contains(&self, env: &mut dyn Environment, key: &K) -> Result<bool, ExecError> {
        Ok(env.get_storage(&self.key(key))?.is_some())
    }

    pub fn insert(&self, env: &mut dyn Environment, key: &K, value: &V) -> Result<(), ExecError> {
        env.set_storage(&self.key(key), value.to_bytes())?;
        Ok(())
    }

    pub fn remove(&self, env: &mut dyn Environment, key: &K) -> Result<(), ExecError> {
        env.clear_storage(&self.key(key))?;
        Ok(())
    }
}

impl<K: Serializer, V: Serializer + Default> Mapping<K, V> {
    pub fn get_or_default(&self, env: &mut dyn Environment, key: &K) -> Result<V, ExecError> {
        Ok(self.get(env, key)?.unwrap_or_default())
    }
}

pub struct Lazy<V> {
    key: &'static [u8],
    _marker: PhantomData<fn() -> V>,
}

impl<V: Serializer> Lazy<V> {
    pub const fn new(key: &'static [u8]) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, env: &mut dyn Environment) -> Result<Option<V>, ExecError> {
        match env.get_storage(self.key)? {
            Some(bytes) => V::from_bytes(&bytes)
                .map(Some)
                .map_err(ExecError::CorruptedStorage),
            None => Ok(None),
        }
    }

    pub fn set(&self, env: &mut dyn Environment, value: &V) -> Result<(), ExecError> {
        env.set_storage(self.key, value.to_bytes())?;
        Ok(())
    }
}

impl<V: Serializer + Default> Lazy<V> {
    pub fn get_or_default(&self, env: &mut dyn Environment) -> Result<V, ExecError> {
        Ok(self.get(env)?.unwrap_or_default())
    }
}
