use seam_core::SqlWriter;

pub struct PostgresSqlWriter {}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_value_float(&self, out: &mut String, value: f64) {
        if value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            out.push_str(buffer.format(value));
            return;
        }
        // Special values are only understood as typed literals
        out.push_str(if value.is_nan() {
            "'NaN'::FLOAT8"
        } else if value > 0.0 {
            "'Infinity'::FLOAT8"
        } else {
            "'-Infinity'::FLOAT8"
        });
    }
}
