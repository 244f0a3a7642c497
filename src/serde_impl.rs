//! `serde` support: a map is encoded as a sequence of `[key, value]` pairs so
//! duplicate keys and position order survive any format.

use crate::storage::ChunkedStore;
use crate::vector_map::VectorMap;
use core::fmt;
use core::marker::PhantomData;

impl<K, V, const DELTA: usize> serde::Serialize for VectorMap<K, V, DELTA>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for (key, value) in self {
            seq.serialize_element(&(key, value))?;
        }
        seq.end()
    }
}

impl<'de, K, V, const DELTA: usize> serde::Deserialize<'de> for VectorMap<K, V, DELTA>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{SeqAccess, Visitor};

        struct PairsVisitor<K, V, const DELTA: usize>(PhantomData<(K, V)>);

        impl<'de, K, V, const DELTA: usize> Visitor<'de> for PairsVisitor<K, V, DELTA>
        where
            K: serde::Deserialize<'de>,
            V: serde::Deserialize<'de>,
        {
            type Value = VectorMap<K, V, DELTA>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of [key, value] pairs")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                // Cap the hint; it comes from untrusted input.
                let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
                while let Some(entry) = seq.next_element::<(K, V)>()? {
                    entries.push(entry);
                }
                Ok(VectorMap {
                    store: ChunkedStore::from_vec(entries),
                })
            }
        }

        deserializer.deserialize_seq(PairsVisitor::<K, V, DELTA>(PhantomData))
    }
}
