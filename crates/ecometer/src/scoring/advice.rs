const TOP_TIER: &[&str] = &[
    "Excellent work! You're in the top 10% of efficient users.",
    "Consider installing smart plugs to monitor standby power consumption.",
    "Share your energy-saving tips with the community to earn bonus points!",
];

const ABOVE_AVERAGE: &[&str] = &[
    "Good job! You're doing better than average.",
    "Reduce AC runtime by 30 minutes daily to save ~8% energy.",
    "Switch to LED bulbs if you haven't already - save up to 75% on lighting costs.",
    "Use heavy appliances during off-peak hours (11 PM - 7 AM) for lower rates.",
];

const BELOW_AVERAGE: &[&str] = &[
    "Your usage is above average. Let's work on improving it!",
    "Set your AC to 24°C instead of 18°C - save up to 20% energy.",
    "Unplug devices when not in use - they consume power even on standby.",
    "Use washing machine and dishwasher only with full loads.",
    "Replace old appliances with energy-efficient models (look for 5-star ratings).",
];

const HIGH_CONSUMPTION: &[&str] = &[
    "High energy consumption detected! Immediate action recommended.",
    "Check for faulty appliances or wiring - they may be consuming excess power.",
    "Your AC might be the biggest culprit - service it and use it wisely.",
    "Switch off lights and fans when leaving rooms.",
    "Track your daily usage to identify peak consumption times.",
    "Consider a home energy audit to find hidden energy drains.",
];

/// Ordered advice for a score. Callers decide how many entries to show.
pub fn suggestions_for(eco_score: u8, units_used: f64, avg_usage: f64) -> Vec<String> {
    let table = match eco_score {
        85..=u8::MAX => TOP_TIER,
        70..=84 => ABOVE_AVERAGE,
        50..=69 => BELOW_AVERAGE,
        _ => HIGH_CONSUMPTION,
    };

    let mut suggestions: Vec<String> = table.iter().map(|line| line.to_string()).collect();

    if avg_usage > 0.0 && units_used > avg_usage * 1.5 {
        let excess = ((units_used / avg_usage - 1.0) * 100.0).floor();
        suggestions.insert(
            0,
            format!("You're using {excess:.0}% more than the community average!"),
        );
    }

    suggestions
}
