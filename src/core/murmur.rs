//! MurmurHash64A
//!
//! 为查询片段的结构签名生成稳定的 64 位哈希。日志名称需要跨进程、
//! 跨版本保持一致，因此不能使用 `DefaultHasher`。

const M: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// 日志名称使用的固定种子
pub const SIGNATURE_SEED: u64 = 0x9747_b28c;

/// 计算字节数据的 MurmurHash64A
pub fn murmurhash64a(data: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (data.len() as u64).wrapping_mul(M);

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        let mut k = u64::from_le_bytes(buf);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate() {
            h ^= (*byte as u64) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^ (h >> R)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmurhash64a_consistency() {
        let data = b"VertexSetExpression(TypeId[Person])";
        assert_eq!(
            murmurhash64a(data, SIGNATURE_SEED),
            murmurhash64a(data, SIGNATURE_SEED)
        );
    }

    #[test]
    fn test_murmurhash64a_different_inputs() {
        let h1 = murmurhash64a(b"TypeId[Person]", SIGNATURE_SEED);
        let h2 = murmurhash64a(b"TypeId[Persom]", SIGNATURE_SEED);
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_murmurhash64a_tail_lengths() {
        // 覆盖 0..=7 字节的尾部处理
        let base = b"abcdefghijklmno";
        let mut seen = std::collections::HashSet::new();
        for len in 8..=15 {
            assert!(seen.insert(murmurhash64a(&base[..len], 0)));
        }
    }

    #[test]
    fn test_murmurhash64a_seed_matters() {
        assert_ne!(murmurhash64a(b"x", 1), murmurhash64a(b"x", 2));
    }
}
