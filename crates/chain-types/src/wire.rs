//! # Wire Decoding
//!
//! Decoder for the node's binary block and transaction encoding, as returned
//! hex-encoded by `getblock` with verbosity off.
//!
//! ## Layout
//!
//! ```text
//! block       := header(80) varint(tx_count) tx*
//! header      := version:i32 prev:hash merkle:hash time:u32 bits:u32 nonce:u32
//! tx          := version:i32 [0x00 0x01] varint(n_in) txin* varint(n_out) txout*
//!                [witness(n_in)] lock_time:u32
//! txin        := prev_hash:hash prev_index:u32 var_bytes(script) sequence:u32
//! txout       := value:i64 var_bytes(pk_script)
//! witness     := (varint(n_items) var_bytes*)  -- one stack per input
//! ```
//!
//! All integers are little-endian. Declared counts are checked against the
//! bytes actually left so a hostile count cannot trigger a huge allocation.

use crate::chainhash::{Hash, HASH_SIZE};
use crate::errors::WireError;

/// Largest serialized block accepted.
pub const MAX_BLOCK_PAYLOAD: usize = 4_000_000;

/// Serialized size of a block header.
pub const BLOCK_HEADER_LEN: usize = 80;

const WITNESS_FLAG: u8 = 0x01;

// Smallest possible encodings, used to bound declared counts.
const MIN_TX_IN_LEN: usize = HASH_SIZE + 4 + 1 + 4;
const MIN_TX_OUT_LEN: usize = 8 + 1;
const MIN_TX_LEN: usize = 4 + 1 + 1 + 4;
const MIN_WITNESS_ITEM_LEN: usize = 1;

/// Block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block version.
    pub version: i32,
    /// Hash of the previous block.
    pub prev_block: Hash,
    /// Merkle root of the block's transactions.
    pub merkle_root: Hash,
    /// Unix timestamp (seconds).
    pub timestamp: u32,
    /// Compact difficulty target.
    pub bits: u32,
    /// Proof-of-work nonce.
    pub nonce: u32,
}

impl BlockHeader {
    /// Decode exactly one 80-byte header.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader = Reader::new(bytes);
        let header = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(header)
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            version: r.read_i32()?,
            prev_block: r.read_hash()?,
            merkle_root: r.read_hash()?,
            timestamp: r.read_u32()?,
            bits: r.read_u32()?,
            nonce: r.read_u32()?,
        })
    }

    /// Serialize back into the 80-byte wire form.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOCK_HEADER_LEN);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(self.prev_block.as_bytes());
        out.extend_from_slice(self.merkle_root.as_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.bits.to_le_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Block identifier: double SHA-256 of the serialized header.
    pub fn block_hash(&self) -> Hash {
        Hash::double_sha256(&self.serialize())
    }
}

/// Reference to an output of a previous transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl OutPoint {
    /// The outpoint a coinbase input spends.
    pub fn is_null(&self) -> bool {
        self.index == u32::MAX && self.hash.is_zero()
    }
}

/// Transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    pub previous_output: OutPoint,
    pub signature_script: Vec<u8>,
    /// Witness stack; empty for non-witness transactions.
    pub witness: Vec<Vec<u8>>,
    pub sequence: u32,
}

/// Transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    /// Value in base units.
    pub value: i64,
    pub pk_script: Vec<u8>,
}

/// A decoded transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    /// Decode exactly one transaction.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader = Reader::new(bytes);
        let tx = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(tx)
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, WireError> {
        let version = r.read_i32()?;

        // A zero input count is the segregated-witness marker.
        let mut input_count = r.read_count("transaction input", MIN_TX_IN_LEN)?;
        let mut segwit = false;
        if input_count == 0 {
            let flag = r.read_u8()?;
            if flag != WITNESS_FLAG {
                return Err(WireError::InvalidWitnessFlag(flag));
            }
            segwit = true;
            input_count = r.read_count("transaction input", MIN_TX_IN_LEN)?;
        }

        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TxIn {
                previous_output: OutPoint {
                    hash: r.read_hash()?,
                    index: r.read_u32()?,
                },
                signature_script: r.read_var_bytes("signature script")?,
                witness: Vec::new(),
                sequence: r.read_u32()?,
            });
        }

        let output_count = r.read_count("transaction output", MIN_TX_OUT_LEN)?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TxOut {
                value: r.read_i64()?,
                pk_script: r.read_var_bytes("public key script")?,
            });
        }

        if segwit {
            for input in &mut inputs {
                let items = r.read_count("witness item", MIN_WITNESS_ITEM_LEN)?;
                let mut stack = Vec::with_capacity(items);
                for _ in 0..items {
                    stack.push(r.read_var_bytes("witness item")?);
                }
                input.witness = stack;
            }
        }

        let lock_time = r.read_u32()?;

        Ok(Self {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Whether any input carries witness data.
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    /// A coinbase has exactly one input spending the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        matches!(self.inputs.as_slice(), [only] if only.previous_output.is_null())
    }

    /// Serialization without witness data (the txid preimage).
    pub fn serialize_no_witness(&self) -> Vec<u8> {
        self.encode(false)
    }

    /// Full serialization, including witness data when present.
    pub fn serialize(&self) -> Vec<u8> {
        self.encode(self.has_witness())
    }

    /// Transaction id (witness data excluded).
    pub fn txid(&self) -> Hash {
        Hash::double_sha256(&self.serialize_no_witness())
    }

    /// Witness transaction id. Equal to `txid` for non-witness transactions.
    pub fn wtxid(&self) -> Hash {
        Hash::double_sha256(&self.serialize())
    }

    fn encode(&self, with_witness: bool) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_le_bytes());
        if with_witness {
            out.extend_from_slice(&[0x00, WITNESS_FLAG]);
        }

        write_var_int(&mut out, self.inputs.len() as u64);
        for input in &self.inputs {
            out.extend_from_slice(input.previous_output.hash.as_bytes());
            out.extend_from_slice(&input.previous_output.index.to_le_bytes());
            write_var_bytes(&mut out, &input.signature_script);
            out.extend_from_slice(&input.sequence.to_le_bytes());
        }

        write_var_int(&mut out, self.outputs.len() as u64);
        for output in &self.outputs {
            out.extend_from_slice(&output.value.to_le_bytes());
            write_var_bytes(&mut out, &output.pk_script);
        }

        if with_witness {
            for input in &self.inputs {
                write_var_int(&mut out, input.witness.len() as u64);
                for item in &input.witness {
                    write_var_bytes(&mut out, item);
                }
            }
        }

        out.extend_from_slice(&self.lock_time.to_le_bytes());
        out
    }
}

/// A decoded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Decode a serialized block. The whole input must be consumed.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() > MAX_BLOCK_PAYLOAD {
            return Err(WireError::PayloadTooLarge {
                len: bytes.len(),
                max: MAX_BLOCK_PAYLOAD,
            });
        }

        let mut reader = Reader::new(bytes);
        let header = BlockHeader::read(&mut reader)?;

        let tx_count = reader.read_count("transaction", MIN_TX_LEN)?;
        let mut transactions = Vec::with_capacity(tx_count);
        for _ in 0..tx_count {
            transactions.push(Transaction::read(&mut reader)?);
        }

        reader.finish()?;
        Ok(Self {
            header,
            transactions,
        })
    }

    /// Block identifier.
    pub fn hash(&self) -> Hash {
        self.header.block_hash()
    }

    /// Transaction ids in block order.
    pub fn tx_hashes(&self) -> Vec<Hash> {
        self.transactions.iter().map(Transaction::txid).collect()
    }
}

/// Bounds-checked cursor over a borrowed buffer.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(WireError::UnexpectedEof {
                offset: self.pos,
                needed: n,
                remaining,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8, WireError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    fn read_i64(&mut self) -> Result<i64, WireError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    fn read_hash(&mut self) -> Result<Hash, WireError> {
        Ok(Hash::from_bytes(self.read_array()?))
    }

    /// CompactSize integer; rejects encodings longer than necessary.
    fn read_var_int(&mut self) -> Result<u64, WireError> {
        let discriminant = self.read_u8()?;
        let (value, min) = match discriminant {
            0xff => (self.read_u64()?, 0x1_0000_0000),
            0xfe => (u64::from(self.read_u32()?), 0x1_0000),
            0xfd => (u64::from(self.read_u16()?), 0xfd),
            small => return Ok(u64::from(small)),
        };
        if value < min {
            return Err(WireError::NonCanonicalVarInt {
                value,
                discriminant,
            });
        }
        Ok(value)
    }

    /// A var-int element count that must fit in what is left of the input.
    fn read_count(&mut self, what: &'static str, min_item_len: usize) -> Result<usize, WireError> {
        let count = self.read_var_int()?;
        let max = (self.remaining() / min_item_len) as u64;
        if count > max {
            return Err(WireError::CountTooLarge { what, count, max });
        }
        Ok(count as usize)
    }

    fn read_var_bytes(&mut self, what: &'static str) -> Result<Vec<u8>, WireError> {
        let len = self.read_count(what, 1)?;
        Ok(self.take(len)?.to_vec())
    }

    fn finish(&self) -> Result<(), WireError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(WireError::TrailingBytes(n)),
        }
    }
}

fn write_var_int(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_var_int(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}
