//! Create Date Block
//!
//! Produces one date value from a selected start-date mode and an optional
//! per-field delta, then hands off to the next block. The additive modes use
//! calendar-aware month addition with end-of-month clamping; the `beginning`
//! mode constructs an absolute date directly from the inputs.

use chrono::{Local, NaiveDateTime, Timelike};

use super::calendar;
use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata};
use crate::core::context::ExecutionContext;
use crate::core::metrics::{MetricDefinition, MetricType};
use crate::core::option::ConfigOption;
use crate::core::slot::Slot;
use crate::core::value::{SlotType, Value};

// The month input defaults differently per mode: `beginning` reads it as an
// absolute 1-indexed field (absent means January), the additive modes read
// it as an offset (absent means no change). Keep the two apart.
const ABSENT_MONTH_FIELD0: i64 = 0;
const ABSENT_MONTH_OFFSET: i64 = 0;

/// Signed per-field offsets applied to a base date, in fixed order:
/// years, months, days, hours, minutes, seconds, milliseconds.
struct Delta {
    years: i64,
    months: Option<i64>,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    milliseconds: i64,
}

impl Delta {
    fn read(ctx: &ExecutionContext) -> Self {
        Self {
            years: ctx.input("year").coerce_int().unwrap_or(0),
            // month stays absent here; each mode picks its own default
            months: ctx.input("month").coerce_int(),
            days: ctx.input("day").coerce_int().unwrap_or(0),
            hours: ctx.input("hours").coerce_int().unwrap_or(0),
            minutes: ctx.input("minutes").coerce_int().unwrap_or(0),
            seconds: ctx.input("seconds").coerce_int().unwrap_or(0),
            milliseconds: ctx.input("milliseconds").coerce_int().unwrap_or(0),
        }
    }

    /// Apply the delta additively with calendar rollover
    fn apply(&self, base: NaiveDateTime) -> NaiveDateTime {
        let mut date = base;
        date = calendar::add_years(date, clamp_i32(self.years));
        date = calendar::add_months(date, clamp_i32(self.months.unwrap_or(ABSENT_MONTH_OFFSET)));
        date = calendar::add_days(date, self.days);
        date = calendar::add_hours(date, self.hours);
        date = calendar::add_minutes(date, self.minutes);
        date = calendar::add_seconds(date, self.seconds);
        calendar::add_milliseconds(date, self.milliseconds)
    }
}

fn clamp_i32(n: i64) -> i32 {
    n.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// The moment of invocation in the process-local calendar, at millisecond
/// precision like every date this block produces.
fn invocation_moment() -> NaiveDateTime {
    let now = Local::now().naive_local();
    let millis = now.nanosecond() / 1_000_000 * 1_000_000;
    now.with_nanosecond(millis).unwrap_or(now)
}

pub struct CreateDateBlock {
    metadata: BlockMetadata,
    input_slots: Vec<Slot>,
    output_slots: Vec<Slot>,
    option_defs: Vec<ConfigOption>,
    metric_defs: Vec<MetricDefinition>,
}

impl CreateDateBlock {
    pub fn new() -> Self {
        Self {
            metadata: Self::build_metadata(),
            input_slots: Self::build_inputs(),
            output_slots: Self::build_outputs(),
            option_defs: Self::build_options(),
            metric_defs: Self::build_metrics(),
        }
    }

    fn build_metadata() -> BlockMetadata {
        BlockMetadata {
            id: "create_date".into(),
            name: "Create Date".into(),
            category: BlockCategory::Date,
            description: "Creates a date to use in your blocks.".into(),
            version: "1.0.0".into(),
        }
    }

    fn build_inputs() -> Vec<Slot> {
        let delta_slot = |id: &str, name: &str| {
            Slot::new(
                id,
                name,
                format!(
                    "The {} to add or remove from the date selected in \"Start Date\". (OPTIONAL)",
                    name.to_lowercase()
                ),
                vec![SlotType::Number, SlotType::Unspecified],
            )
        };
        vec![
            Slot::action_input(),
            delta_slot("year", "Year"),
            delta_slot("month", "Month"),
            delta_slot("day", "Day"),
            delta_slot("hours", "Hours"),
            delta_slot("minutes", "Minutes"),
            delta_slot("seconds", "Seconds"),
            delta_slot("milliseconds", "Milliseconds"),
            Slot::new(
                "custom_date",
                "Custom Date",
                "The base date when \"Start Date\" is set to \"Custom Date\".",
                vec![SlotType::Date, SlotType::Unspecified],
            ),
        ]
    }

    fn build_outputs() -> Vec<Slot> {
        vec![
            Slot::action_output(
                "action",
                "Action",
                "Executes the following blocks when this block finishes its task.",
            ),
            Slot::new("date", "Date", "The date created.", vec![SlotType::Date]),
        ]
    }

    fn build_options() -> Vec<ConfigOption> {
        vec![ConfigOption::select(
            "start_date",
            "Start Date",
            "The start date. The inputs above add to or remove from it.",
            &[
                ("current", "Current Time"),
                ("beginning", "Beginning of Time"),
                ("custom", "Custom Date"),
            ],
        )]
    }

    fn build_metrics() -> Vec<MetricDefinition> {
        vec![MetricDefinition {
            id: "delta_fields_set".into(),
            name: "Delta Fields Set".into(),
            metric_type: MetricType::Gauge,
            unit: "fields".into(),
            description: "How many of the seven delta inputs carried a usable number".into(),
        }]
    }
}

impl Default for CreateDateBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Block for CreateDateBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }
    fn inputs(&self) -> &[Slot] {
        &self.input_slots
    }
    fn outputs(&self) -> &[Slot] {
        &self.output_slots
    }
    fn options(&self) -> &[ConfigOption] {
        &self.option_defs
    }
    fn metrics(&self) -> &[MetricDefinition] {
        &self.metric_defs
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), BlockError> {
        let delta = Delta::read(ctx);

        let fields_set = ["year", "month", "day", "hours", "minutes", "seconds", "milliseconds"]
            .iter()
            .filter(|key| ctx.input(key).coerce_int().is_some())
            .count();
        ctx.metrics.record("delta_fields_set", fields_set as f64);

        let date = match ctx.option("start_date").as_text().unwrap_or_default() {
            "beginning" => {
                // the month input is 1-indexed; convert before construction
                let month0 = delta
                    .months
                    .map(|m| m - 1)
                    .unwrap_or(ABSENT_MONTH_FIELD0);
                calendar::build_date(
                    delta.years,
                    month0,
                    delta.days,
                    delta.hours,
                    delta.minutes,
                    delta.seconds,
                    delta.milliseconds,
                )
            }
            "custom" => {
                let base = ctx
                    .input("custom_date")
                    .as_date()
                    .unwrap_or_else(invocation_moment);
                delta.apply(base)
            }
            // anything else behaves as the current moment
            _ => delta.apply(invocation_moment()),
        };

        ctx.logger.debug(&format!("created date {date}"));
        ctx.store_output("date", Value::Date(date));
        ctx.trigger("action");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::harness::run_block;
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::HashMap;

    fn parse(s: &str) -> NaiveDateTime {
        const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.3f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
        for format in FORMATS {
            if let Ok(d) = NaiveDateTime::parse_from_str(s, format) {
                return d;
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    fn run(
        inputs: Vec<(&str, Value)>,
        start_date: &str,
    ) -> crate::runtime::harness::Invocation {
        let block = CreateDateBlock::new();
        let inputs: HashMap<String, Value> = inputs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let overrides = HashMap::from([("start_date".to_string(), Value::from(start_date))]);
        run_block(&block, inputs, overrides).unwrap()
    }

    fn output_date(invocation: &crate::runtime::harness::Invocation) -> NaiveDateTime {
        invocation.outputs["date"].as_date().unwrap()
    }

    #[test]
    fn test_custom_mode_delta_table() {
        let cases: &[(&str, &str, i64, &str)] = &[
            ("2024-12-02", "year", -1, "2023-12-02"),
            ("2024-12-02", "month", -1, "2024-11-02"),
            ("2025-01-01", "month", -1, "2024-12-01"),
            ("2025-01-31", "month", -2, "2024-11-30"),
            ("2024-11-02", "month", 1, "2024-12-02"),
            ("2024-12-01", "month", 1, "2025-01-01"),
            ("2024-11-30", "month", 2, "2025-01-30"),
            ("2024-12-02", "day", -1, "2024-12-01"),
            ("2024-12-01", "day", -1, "2024-11-30"),
            ("2024-11-01", "day", -1, "2024-10-31"),
            ("2024-12-02T23:30", "hours", -1, "2024-12-02T22:30"),
            ("2024-12-02T00:00", "hours", -1, "2024-12-01T23:00"),
            ("2024-12-02T23:30", "minutes", -1, "2024-12-02T23:29"),
            ("2024-12-02T23:00", "minutes", -1, "2024-12-02T22:59"),
            ("2024-12-02T00:00:05", "seconds", -1, "2024-12-02T00:00:04"),
            ("2024-12-02T23:30:00", "seconds", -1, "2024-12-02T23:29:59"),
            ("2024-12-02T00:00:00.003", "milliseconds", -1, "2024-12-02T00:00:00.002"),
            ("2024-12-02T23:00:01.000", "milliseconds", -1, "2024-12-02T23:00:00.999"),
        ];

        for &(start, field, amount, expected) in cases {
            let invocation = run(
                vec![
                    ("custom_date", Value::Date(parse(start))),
                    (field, Value::from(amount)),
                ],
                "custom",
            );
            assert_eq!(
                output_date(&invocation),
                parse(expected),
                "({start}, {field}: {amount})"
            );
            assert_eq!(invocation.triggered, ["action"]);
        }
    }

    #[test]
    fn test_custom_mode_without_delta_returns_base() {
        let base = parse("2024-01-01T00:00:00");
        let invocation = run(vec![("custom_date", Value::Date(base))], "custom");
        assert_eq!(output_date(&invocation), base);
    }

    #[test]
    fn test_custom_mode_without_date_falls_back_to_now() {
        let before = invocation_moment();
        let invocation = run(vec![("custom_date", Value::from("not a date"))], "custom");
        let after = invocation_moment();
        let produced = output_date(&invocation);
        assert!(produced >= before && produced <= after);
    }

    #[test]
    fn test_current_mode_brackets_now() {
        let before = invocation_moment();
        let invocation = run(vec![], "current");
        let after = invocation_moment();
        let produced = output_date(&invocation);
        assert!(produced >= before && produced <= after);
    }

    #[test]
    fn test_unknown_mode_behaves_as_current() {
        let before = invocation_moment();
        let invocation = run(vec![], "bogus");
        let after = invocation_moment();
        let produced = output_date(&invocation);
        assert!(produced >= before && produced <= after);
    }

    #[test]
    fn test_beginning_mode_fixed_date() {
        let invocation = run(
            vec![
                ("year", Value::from(2024i64)),
                ("month", Value::from(1i64)),
                ("day", Value::from(1i64)),
            ],
            "beginning",
        );
        assert_eq!(output_date(&invocation), parse("2024-01-01T00:00:00"));
    }

    #[test]
    fn test_beginning_mode_full_components() {
        let invocation = run(
            vec![
                ("year", Value::from(2024i64)),
                ("month", Value::from(6i64)),
                ("day", Value::from(15i64)),
                ("hours", Value::from(8i64)),
                ("minutes", Value::from(30i64)),
                ("seconds", Value::from(15i64)),
                ("milliseconds", Value::from(250i64)),
            ],
            "beginning",
        );
        assert_eq!(output_date(&invocation), parse("2024-06-15T08:30:15.250"));
    }

    #[test]
    fn test_month_default_asymmetry() {
        // absent month in `beginning` means January of the given year
        let fixed = run(
            vec![("year", Value::from(2024i64)), ("day", Value::from(1i64))],
            "beginning",
        );
        assert_eq!(output_date(&fixed), parse("2024-01-01T00:00:00"));

        // absent month in the additive modes means no month change at all
        let base = parse("2024-05-20T12:00:00");
        let additive = run(vec![("custom_date", Value::Date(base))], "custom");
        assert_eq!(output_date(&additive), base);
    }

    #[test]
    fn test_malformed_numeric_inputs_default_to_zero() {
        let base = parse("2024-05-20T12:00:00");
        let invocation = run(
            vec![
                ("custom_date", Value::Date(base)),
                ("year", Value::from("junk")),
                ("day", Value::Null),
                ("hours", Value::Bool(true)),
            ],
            "custom",
        );
        assert_eq!(output_date(&invocation), base);
    }

    #[test]
    fn test_delta_order_years_before_months() {
        // Feb 29 + 1 year rolls to Mar 1 first, then the month offset applies
        let base = parse("2024-02-29T00:00:00");
        let invocation = run(
            vec![
                ("custom_date", Value::Date(base)),
                ("year", Value::from(1i64)),
                ("month", Value::from(1i64)),
            ],
            "custom",
        );
        assert_eq!(output_date(&invocation), parse("2025-04-01T00:00:00"));
    }

    #[test]
    fn test_metadata() {
        let block = CreateDateBlock::new();
        assert_eq!(block.metadata().id, "create_date");
        assert_eq!(block.metadata().category, BlockCategory::Date);
        assert_eq!(block.options()[0].default_value(), Value::from("current"));
    }
}
