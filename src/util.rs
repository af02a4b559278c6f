/// Column width of every string produced by [`format_size`].
pub const SIZE_WIDTH: usize = 10;

const KIB: u128 = 1024;
const MIB: u128 = 1024 * 1024;
const GIB: u128 = 1024 * 1024 * 1024;
const TIB: u128 = GIB * 1024;
const PIB: u128 = TIB * 1024;
const EIB: u128 = PIB * 1024;

// Units past GB only come into play when the GB rendering would no longer fit
// the column (more than 99999.9 GB).
const UNITS: [(u128, &str); 6] = [
    (KIB, "KB"),
    (MIB, "MB"),
    (GIB, "GB"),
    (TIB, "TB"),
    (PIB, "PB"),
    (EIB, "EB"),
];

/// Fixed-width human-readable size for table columns (binary units).
///
/// Accepts signed input since upstream callers sometimes hand over a size
/// computed from a failed stat; anything negative renders as zero bytes.
pub fn format_file_size(bytes: i64) -> String {
    format_size(u64::try_from(bytes).unwrap_or(0))
}

/// Fixed-width human-readable size: always [`SIZE_WIDTH`] characters.
///
/// - `< 1 KiB`: `"  0 B     "` (number right-aligned to 3, padded after the unit)
/// - otherwise one decimal, rounded half-up, right-aligned: `"    1.0 KB"`
pub fn format_size(bytes: u64) -> String {
    let b = bytes as u128;
    if b < KIB {
        let s = format!("{:>3} B", bytes);
        return format!("{:<width$}", s, width = SIZE_WIDTH);
    }

    // Start at the natural tier, move up only while the text overflows.
    let start = if b < MIB {
        0
    } else if b < GIB {
        1
    } else {
        2
    };

    let mut rendered = String::new();
    for &(unit, label) in &UNITS[start..] {
        rendered = format!("{} {}", one_decimal(b, unit), label);
        if rendered.len() <= SIZE_WIDTH {
            break;
        }
    }

    format!("{:>width$}", rendered, width = SIZE_WIDTH)
}

// Integer round-half-up to tenths, so 1.25 KB shows as 1.3 rather than the
// float formatter's tie-to-even 1.2.
fn one_decimal(bytes: u128, unit: u128) -> String {
    let tenths = (bytes * 10 + unit / 2) / unit;
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_tier_is_left_anchored() {
        assert_eq!(format_size(0), "  0 B     ");
        assert_eq!(format_size(7), "  7 B     ");
        assert_eq!(format_size(512), "512 B     ");
        assert_eq!(format_size(1023), "1023 B    ");
    }

    #[test]
    fn unit_boundaries() {
        assert_eq!(format_size(1024), "    1.0 KB");
        assert_eq!(format_size(1_048_576), "    1.0 MB");
        assert_eq!(format_size(1_073_741_824), "    1.0 GB");
    }

    #[test]
    fn rounds_half_up() {
        // 1280 / 1024 = 1.25
        assert_eq!(format_size(1280), "    1.3 KB");
        assert_eq!(format_size(1536), "    1.5 KB");
        // 1023.96 KB rounds into a four digit KB value, still within the column
        assert_eq!(format_size(1_048_535), " 1024.0 KB");
    }

    #[test]
    fn negative_clamps_to_zero() {
        assert_eq!(format_file_size(-1), "  0 B     ");
        assert_eq!(format_file_size(i64::MIN), "  0 B     ");
        assert_eq!(format_file_size(2048), "    2.0 KB");
    }

    #[test]
    fn width_is_constant() {
        let mut samples = vec![0u64, 1, 999, 1023, 1024, 10_000, 999_999, u64::MAX];
        let mut v = 1u64;
        while let Some(next) = v.checked_mul(3) {
            samples.push(next);
            v = next;
        }
        for b in samples {
            assert_eq!(format_size(b).chars().count(), SIZE_WIDTH, "bytes={b}");
        }
    }

    #[test]
    fn huge_values_move_past_gb() {
        // 99999.9 GB still fits
        assert_eq!(format_size(99_999 * GIB as u64), "99999.0 GB");
        assert_eq!(format_size(200_000 * GIB as u64), "  195.3 TB");
        assert_eq!(format_size(u64::MAX), "16384.0 PB");
    }
}
