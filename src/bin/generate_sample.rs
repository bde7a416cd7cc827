use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform value in `[low, high)`.
    fn range(&mut self, low: u64, high: u64) -> u64 {
        low + self.next_u64() % (high - low)
    }
}

fn write_table(dir: &Path, name: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let path = dir.join(name);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("resource"));
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // Items: one upgradeable block (base of 110000~110099), a run of
    // consumables with 27005 listed twice, and 999999 that has no name.
    let mut item_vnums: Vec<u32> = vec![110000];
    item_vnums.extend(27001..=27010);
    item_vnums.push(27005);
    item_vnums.push(999999);

    let item_proto: Vec<Vec<String>> = item_vnums
        .iter()
        .map(|vnum| {
            vec![
                vnum.to_string(),
                format!("item_{vnum}"),
                rng.range(1, 30).to_string(),
                (rng.range(1, 500) * 10).to_string(),
            ]
        })
        .collect();
    write_table(&dir, "item_proto.txt", &["Vnum", "Name", "Type", "Gold"], &item_proto)?;

    // 50050 has a name but no proto row.
    let mut item_names = vec![vec!["110000~110099".to_string(), "Sword".to_string()]];
    for vnum in (27001..=27010).chain([50050]) {
        item_names.push(vec![vnum.to_string(), format!("Item {vnum}")]);
    }
    write_table(&dir, "item_names.txt", &["VNUM", "LOCALE_NAME"], &item_names)?;

    // Mobs: 101..=120 in proto, names skip 117 and add 121.
    let mob_proto: Vec<Vec<String>> = (101..=120)
        .map(|vnum: u32| {
            vec![
                vnum.to_string(),
                format!("mob_{vnum}"),
                rng.range(1, 99).to_string(),
            ]
        })
        .collect();
    write_table(&dir, "mob_proto.txt", &["Vnum", "Name", "Level"], &mob_proto)?;

    let mob_names: Vec<Vec<String>> = (101..=121)
        .filter(|vnum: &u32| *vnum != 117)
        .map(|vnum| vec![vnum.to_string(), format!("Monster {vnum}")])
        .collect();
    write_table(&dir, "mob_names.txt", &["VNUM", "LOCALE_NAME"], &mob_names)?;

    Ok(())
}
