//! Rate command for the default hourly rate.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use mj_db::KeyValueStore;

use crate::app::App;
use crate::render::format_money;

#[derive(Debug, Args)]
pub struct RateArgs {
    /// New default hourly rate; omit to show the current one.
    pub value: Option<f64>,
}

pub fn run<W: Write, B: KeyValueStore>(
    writer: &mut W,
    app: &mut App<B>,
    args: &RateArgs,
) -> Result<()> {
    let currency = app.config.base_currency.clone();
    match args.value {
        Some(rate) => {
            app.set_hourly_rate(rate)?;
            writeln!(writer, "Hourly rate set to {}", format_money(rate, &currency))?;
        }
        None => {
            writeln!(
                writer,
                "Hourly rate: {}",
                format_money(app.hourly_rate(), &currency)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::app::tests::test_app;

    fn rate(app: &mut App<mj_db::MemoryStore>, value: Option<f64>) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, app, &RateArgs { value })?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn shows_default_rate() {
        let mut app = test_app();
        assert_snapshot!(rate(&mut app, None).unwrap(), @"Hourly rate: €12.82");
    }

    #[test]
    fn sets_and_shows_new_rate() {
        let mut app = test_app();
        assert_snapshot!(rate(&mut app, Some(13.5)).unwrap(), @"Hourly rate set to €13.50");
        assert_snapshot!(rate(&mut app, None).unwrap(), @"Hourly rate: €13.50");
    }

    #[test]
    fn rejects_non_positive_rate() {
        let mut app = test_app();
        assert!(rate(&mut app, Some(-1.0)).is_err());
    }
}
