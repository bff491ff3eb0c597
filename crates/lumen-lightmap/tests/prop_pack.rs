use lumen_lightmap::{
    LIGHTMAP_BYTES, LightmapConfig, LightmapRect, MemoryImages, RawLightmaps, build_lightmaps,
    pack_dims,
};
use proptest::prelude::*;

fn pow2() -> impl Strategy<Value = usize> {
    (3u32..=7).prop_map(|e| 1usize << e)
}

proptest! {
    // One pass never takes more blocks than remain and stays within its limits
    #[test]
    fn pack_dims_fit(remaining in 2usize..500, max_x in 1usize..64, max_y in 1usize..64) {
        let [cols, rows] = pack_dims(remaining, max_x, max_y);
        prop_assert!(cols.is_power_of_two() && rows.is_power_of_two());
        prop_assert!(cols <= max_x && rows <= max_y);
        prop_assert!(cols * rows <= remaining);
    }

    // Every source block can be read back unchanged through its rect
    #[test]
    fn atlas_round_trip(
        n in 1usize..24,
        w in 1usize..6,
        h in 1usize..6,
        packing in any::<bool>(),
        max_block_size in pow2(),
        seed in any::<u8>(),
    ) {
        let block = w * h * LIGHTMAP_BYTES;
        let data: Vec<u8> = (0..n * block).map(|i| (i as u8).wrapping_mul(13).wrapping_add(seed)).collect();
        let raw = RawLightmaps::new(w, h, n, Some(&data));
        let mut cfg = LightmapConfig {
            packing,
            max_block_size,
            overbright_bits: 0,
            ..LightmapConfig::default()
        };
        let mut rects = vec![LightmapRect::default(); n];
        let mut mem = MemoryImages::new();
        let images = build_lightmaps(&mut cfg, raw, &mut rects, &mut mem);
        prop_assert!(images.len() <= n);

        for (i, rect) in rects.iter().enumerate() {
            let img = mem.get(images.get(rect.texture).unwrap()).unwrap();
            let [ox, oy] = rect.texel_origin(w, h);
            let src = raw.block(i).unwrap();
            for y in 0..h {
                for x in 0..w {
                    let at = (y * w + x) * LIGHTMAP_BYTES;
                    prop_assert_eq!(img.texel(ox + x, oy + y).unwrap(), &src[at..at + LIGHTMAP_BYTES]);
                }
            }
        }
    }
}
