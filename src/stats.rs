use crate::catalog::QUOTES;
use crate::models::{
    CalendarDay, CalendarMonth, ChartPoint, DailyLog, DaySummary, Friend, Habit, Insights,
    LeaderboardEntry, Milestone, Quote, TimeRange, TopHabit, WorstWeekday,
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::HashMap;

const STREAK_LOOKBACK_DAYS: i64 = 30;
const INSIGHT_WINDOW_DAYS: i64 = 30;
const TOP_HABIT_COUNT: usize = 3;

const SHORT_WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];
const WEEKDAY_NAMES: [&str; 7] = ["일요일", "월요일", "화요일", "수요일", "목요일", "금요일", "토요일"];

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accepts only the 10-byte `YYYY-MM-DD` form used for log keys.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn active_count(habits: &[Habit]) -> usize {
    habits.iter().filter(|habit| habit.is_active()).count()
}

pub fn completions_on(logs: &DailyLog, date: NaiveDate) -> usize {
    logs.get(&date_key(date)).map_or(0, Vec::len)
}

/// Share of active habits completed on `date`, in `[0, 100]`.
pub fn completion_percentage(habits: &[Habit], logs: &DailyLog, date: NaiveDate) -> f64 {
    let active = active_count(habits);
    if active == 0 {
        return 0.0;
    }
    let ratio = completions_on(logs, date) as f64 / active as f64;
    (ratio * 100.0).min(100.0)
}

/// Consecutive fully-completed days ending at `today`.
///
/// Every day is measured against the number of habits active now, not the
/// number that was active on that day. Returns 0 when today is not complete.
pub fn streak(habits: &[Habit], logs: &DailyLog, today: NaiveDate) -> u32 {
    let active = active_count(habits);
    if active == 0 || completions_on(logs, today) < active {
        return 0;
    }

    let mut streak = 1;
    for offset in 1..=STREAK_LOOKBACK_DAYS {
        let date = today - Duration::days(offset);
        if completions_on(logs, date) >= active {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

pub fn milestone_for(streak: u32) -> Option<Milestone> {
    match streak {
        7 => Some(Milestone::SevenDays),
        30 => Some(Milestone::ThirtyDays),
        _ => None,
    }
}

pub fn chart_series(habits: &[Habit], logs: &DailyLog, range: TimeRange) -> Vec<ChartPoint> {
    chart_series_at(today(), habits, logs, range)
}

pub fn chart_series_at(
    today: NaiveDate,
    habits: &[Habit],
    logs: &DailyLog,
    range: TimeRange,
) -> Vec<ChartPoint> {
    let goal = active_count(habits) as u32;

    match range {
        TimeRange::Week => (0..7)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                ChartPoint {
                    label: SHORT_WEEKDAYS[weekday_index(date)].to_string(),
                    goal,
                    completed: completions_on(logs, date) as u32,
                }
            })
            .collect(),
        TimeRange::Month => (0..30)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                let label = if offset % 5 == 0 {
                    date.day().to_string()
                } else {
                    String::new()
                };
                ChartPoint {
                    label,
                    goal,
                    completed: completions_on(logs, date) as u32,
                }
            })
            .collect(),
        TimeRange::Year => {
            let mut points = Vec::with_capacity(12);
            let current = today.year() * 12 + today.month0() as i32;
            for offset in (0..12).rev() {
                let Some(start) = month_start(current - offset) else {
                    continue;
                };

                let mut completed = 0u32;
                let mut month_goal = 0u32;
                for date in days_of_month(start) {
                    completed = completed.saturating_add(completions_on(logs, date) as u32);
                    month_goal = month_goal.saturating_add(goal);
                }

                points.push(ChartPoint {
                    label: format!("{}월", start.month()),
                    goal: month_goal,
                    completed,
                });
            }
            points
        }
    }
}

pub fn insights(habits: &[Habit], logs: &DailyLog) -> Insights {
    insights_at(today(), habits, logs)
}

pub fn insights_at(today: NaiveDate, habits: &[Habit], logs: &DailyLog) -> Insights {
    let active = active_count(habits) as u32;
    Insights {
        weekly_rate: weekly_rate(today, active, logs),
        top_habits: top_habits(today, habits, logs),
        worst_weekday: worst_weekday(today, active, logs),
    }
}

fn weekly_rate(today: NaiveDate, active: u32, logs: &DailyLog) -> u32 {
    let mut completed = 0u32;
    let mut goal = 0u32;
    for offset in 0..7 {
        completed += completions_on(logs, today - Duration::days(offset)) as u32;
        goal += active;
    }
    if goal == 0 {
        return 0;
    }
    (completed as f64 / goal as f64 * 100.0).round() as u32
}

fn top_habits(today: NaiveDate, habits: &[Habit], logs: &DailyLog) -> Vec<TopHabit> {
    // First-seen order is the tie-break, so counts live in a Vec.
    let mut counts: Vec<(&str, u32)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for offset in 0..INSIGHT_WINDOW_DAYS {
        let key = date_key(today - Duration::days(offset));
        let Some(ids) = logs.get(&key) else {
            continue;
        };
        for id in ids {
            match positions.get(id.as_str()) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(id.as_str(), counts.len());
                    counts.push((id.as_str(), 1));
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_HABIT_COUNT)
        .filter_map(|(id, count)| {
            habits.iter().find(|habit| habit.id == id).map(|habit| TopHabit {
                name: habit.name.clone(),
                count,
            })
        })
        .collect()
}

fn worst_weekday(today: NaiveDate, active: u32, logs: &DailyLog) -> Option<WorstWeekday> {
    let mut completed = [0u32; 7];
    let mut total = [0u32; 7];
    for offset in 0..INSIGHT_WINDOW_DAYS {
        let date = today - Duration::days(offset);
        let idx = weekday_index(date);
        completed[idx] += completions_on(logs, date) as u32;
        total[idx] += active;
    }

    let mut worst: Option<WorstWeekday> = None;
    for idx in 0..7 {
        if total[idx] == 0 {
            continue;
        }
        let rate = completed[idx] as f64 / total[idx] as f64 * 100.0;
        if worst.as_ref().is_none_or(|current| rate < current.rate) {
            worst = Some(WorstWeekday {
                index: idx as u8,
                name: WEEKDAY_NAMES[idx].to_string(),
                rate,
            });
        }
    }
    worst
}

/// Friends plus the user, highest score first. Equal scores keep input order.
pub fn leaderboard(
    friends: &[Friend],
    habits: &[Habit],
    logs: &DailyLog,
    selected: NaiveDate,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = friends
        .iter()
        .map(|friend| LeaderboardEntry {
            id: friend.id.clone(),
            name: friend.name.clone(),
            avatar: friend.avatar.clone(),
            score: friend.score,
            status_message: friend.status_message.clone(),
            is_me: false,
        })
        .collect();

    entries.push(LeaderboardEntry {
        id: "me".to_string(),
        name: "나".to_string(),
        avatar: "🧑‍🚀".to_string(),
        score: completion_percentage(habits, logs, selected).round() as u8,
        status_message: "집중하는 중...".to_string(),
        is_me: true,
    });

    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

/// Quote of the day, stable for a given date.
pub fn daily_quote(date: NaiveDate) -> Quote {
    let mut hash: i64 = 0;
    for unit in date_key(date).encode_utf16() {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit) + (shifted - hash);
    }
    let index = (hash.unsigned_abs() % QUOTES.len() as u64) as usize;
    QUOTES[index]
}

pub fn calendar_month(
    habits: &[Habit],
    logs: &DailyLog,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Option<CalendarMonth> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = days_of_month(start)
        .map(|date| CalendarDay {
            date: date_key(date),
            day: date.day(),
            has_data: completions_on(logs, date) > 0,
            is_today: date == today,
            percentage: completion_percentage(habits, logs, date).round() as u32,
        })
        .collect();

    Some(CalendarMonth {
        year,
        month,
        leading_blanks: start.weekday().num_days_from_sunday(),
        days,
    })
}

pub fn day_summary(
    habits: &[Habit],
    logs: &DailyLog,
    date: NaiveDate,
    today: NaiveDate,
) -> DaySummary {
    let key = date_key(date);
    DaySummary {
        completed: logs.get(&key).cloned().unwrap_or_default(),
        date: key,
        is_today: date == today,
        active_count: active_count(habits),
        percentage: completion_percentage(habits, logs, date),
        quote: daily_quote(date),
    }
}

fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// First day of the month numbered `year * 12 + month0`.
fn month_start(index: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

fn days_of_month(start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let month = start.month();
    start.iter_days().take_while(move |date| date.month() == month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit(id: &str) -> Habit {
        Habit::new(id.to_string(), format!("habit {id}"), 0)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log_day(logs: &mut DailyLog, date: NaiveDate, ids: &[&str]) {
        logs.insert(date_key(date), ids.iter().map(|id| id.to_string()).collect());
    }

    #[test]
    fn percentage_is_zero_without_active_habits() {
        let mut deleted = habit("a");
        deleted.is_deleted = true;
        let mut logs = DailyLog::new();
        let date = day(2024, 1, 10);
        log_day(&mut logs, date, &["a"]);

        assert_eq!(completion_percentage(&[], &logs, date), 0.0);
        assert_eq!(completion_percentage(&[deleted], &logs, date), 0.0);
    }

    #[test]
    fn percentage_follows_completions() {
        let habits = vec![habit("a"), habit("b")];
        let date = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        assert_eq!(completion_percentage(&habits, &logs, date), 0.0);

        log_day(&mut logs, date, &["a"]);
        assert_eq!(completion_percentage(&habits, &logs, date), 50.0);

        log_day(&mut logs, date, &["a", "b"]);
        assert_eq!(completion_percentage(&habits, &logs, date), 100.0);
    }

    #[test]
    fn percentage_is_capped_when_log_holds_deleted_habits() {
        let mut gone = habit("b");
        gone.is_deleted = true;
        let habits = vec![habit("a"), gone];
        let date = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        log_day(&mut logs, date, &["a", "b"]);

        assert_eq!(completion_percentage(&habits, &logs, date), 100.0);
    }

    #[test]
    fn streak_counts_consecutive_full_days() {
        let habits = vec![habit("a"), habit("b")];
        let today = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        for offset in 0..7 {
            log_day(&mut logs, today - Duration::days(offset), &["a", "b"]);
        }
        // a partial day before the run ends it
        log_day(&mut logs, today - Duration::days(7), &["a"]);

        let streak = streak(&habits, &logs, today);
        assert_eq!(streak, 7);
        assert_eq!(milestone_for(streak), Some(Milestone::SevenDays));
    }

    #[test]
    fn streak_is_zero_when_today_incomplete() {
        let habits = vec![habit("a"), habit("b")];
        let today = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        for offset in 1..10 {
            log_day(&mut logs, today - Duration::days(offset), &["a", "b"]);
        }
        log_day(&mut logs, today, &["a"]);

        assert_eq!(streak(&habits, &logs, today), 0);
        assert_eq!(streak(&[], &logs, today), 0);
    }

    #[test]
    fn streak_lookback_is_capped() {
        let habits = vec![habit("a")];
        let today = day(2024, 3, 1);
        let mut logs = DailyLog::new();
        for offset in 0..60 {
            log_day(&mut logs, today - Duration::days(offset), &["a"]);
        }

        assert_eq!(streak(&habits, &logs, today), 31);
        assert_eq!(milestone_for(31), None);
        assert_eq!(milestone_for(30), Some(Milestone::ThirtyDays));
    }

    #[test]
    fn week_chart_is_oldest_first() {
        let habits = vec![habit("a"), habit("b")];
        let today = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        log_day(&mut logs, today, &["a"]);
        log_day(&mut logs, today - Duration::days(6), &["a", "b"]);

        let points = chart_series_at(today, &habits, &logs, TimeRange::Week);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].label, "목");
        assert_eq!(points[0].completed, 2);
        assert_eq!(points[6].label, "수");
        assert_eq!(points[6].completed, 1);
        assert!(points.iter().all(|p| p.goal == 2));
    }

    #[test]
    fn month_chart_labels_every_fifth_day() {
        let today = day(2024, 1, 10);
        let points = chart_series_at(today, &[habit("a")], &DailyLog::new(), TimeRange::Month);
        assert_eq!(points.len(), 30);
        assert_eq!(points[29].label, "10");
        assert_eq!(points[24].label, "5");
        assert_eq!(points[0].label, "");
        assert_eq!(points.iter().filter(|p| !p.label.is_empty()).count(), 6);
    }

    #[test]
    fn year_chart_sums_whole_months() {
        let habits = vec![habit("a"), habit("b")];
        let today = day(2024, 3, 15);
        let mut logs = DailyLog::new();
        log_day(&mut logs, day(2024, 2, 1), &["a"]);
        log_day(&mut logs, day(2024, 2, 29), &["a", "b"]);
        log_day(&mut logs, day(2024, 3, 31), &["a"]);

        let points = chart_series_at(today, &habits, &logs, TimeRange::Year);
        assert_eq!(points.len(), 12);
        assert_eq!(points[0].label, "4월");
        assert_eq!(points[10].label, "2월");
        assert_eq!(points[10].goal, 58);
        assert_eq!(points[10].completed, 3);
        assert_eq!(points[11].label, "3월");
        assert_eq!(points[11].goal, 62);
        assert_eq!(points[11].completed, 1);
    }

    #[test]
    fn weekly_rate_rounds() {
        let habits = vec![habit("a"), habit("b"), habit("c")];
        let today = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        log_day(&mut logs, today, &["a", "b"]);
        log_day(&mut logs, today - Duration::days(3), &["a"]);
        // outside the 7-day window
        log_day(&mut logs, today - Duration::days(7), &["a", "b", "c"]);

        let insights = insights_at(today, &habits, &logs);
        // 3 of 21
        assert_eq!(insights.weekly_rate, 14);
        assert_eq!(insights_at(today, &[], &logs).weekly_rate, 0);
    }

    #[test]
    fn top_habits_rank_by_count_with_stable_ties() {
        let habits = vec![habit("x"), habit("y"), habit("z"), habit("w")];
        let today = day(2024, 1, 30);
        let mut logs = DailyLog::new();
        for offset in 0..30 {
            let mut ids = Vec::new();
            if offset < 20 {
                ids.push("x");
            }
            if offset < 15 {
                ids.push("y");
            }
            if offset < 5 {
                ids.push("z");
                ids.push("w");
            }
            log_day(&mut logs, today - Duration::days(offset), &ids);
        }

        let top = insights_at(today, &habits, &logs).top_habits;
        assert_eq!(
            top,
            vec![
                TopHabit { name: "habit x".into(), count: 20 },
                TopHabit { name: "habit y".into(), count: 15 },
                TopHabit { name: "habit z".into(), count: 5 },
            ]
        );
    }

    #[test]
    fn top_habits_drop_unknown_ids_but_keep_deleted() {
        let mut deleted = habit("d");
        deleted.is_deleted = true;
        let habits = vec![habit("a"), deleted];
        let today = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        log_day(&mut logs, today, &["ghost", "d", "a"]);
        log_day(&mut logs, today - Duration::days(1), &["ghost", "d"]);

        let top = insights_at(today, &habits, &logs).top_habits;
        assert_eq!(
            top,
            vec![
                TopHabit { name: "habit d".into(), count: 2 },
                TopHabit { name: "habit a".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn worst_weekday_picks_lowest_rate() {
        let habits = vec![habit("a")];
        // Wednesday
        let today = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        for offset in 0..30 {
            let date = today - Duration::days(offset);
            if weekday_index(date) != 1 {
                log_day(&mut logs, date, &["a"]);
            }
        }

        let worst = insights_at(today, &habits, &logs).worst_weekday.unwrap();
        assert_eq!(worst.index, 1);
        assert_eq!(worst.name, "월요일");
        assert_eq!(worst.rate, 0.0);
    }

    #[test]
    fn worst_weekday_ties_go_to_sunday_first() {
        let habits = vec![habit("a")];
        let today = day(2024, 1, 10);
        let worst = insights_at(today, &habits, &DailyLog::new()).worst_weekday.unwrap();
        assert_eq!(worst.index, 0);
        assert_eq!(worst.name, "일요일");

        assert!(insights_at(today, &[], &DailyLog::new()).worst_weekday.is_none());
    }

    #[test]
    fn leaderboard_is_sorted_with_one_self_entry() {
        let friend = |id: &str, score: u8| Friend {
            id: id.to_string(),
            name: id.to_string(),
            avatar: "👽".to_string(),
            score,
            status_message: String::new(),
        };
        let friends = vec![friend("nova", 75), friend("luna", 40), friend("star", 50)];
        let habits = vec![habit("a"), habit("b")];
        let date = day(2024, 1, 10);
        let mut logs = DailyLog::new();
        log_day(&mut logs, date, &["a"]);

        let board = leaderboard(&friends, &habits, &logs, date);
        assert_eq!(board.len(), friends.len() + 1);
        assert_eq!(board.iter().filter(|e| e.is_me).count(), 1);
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
        let ids: Vec<&str> = board.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["nova", "star", "me", "luna"]);
    }

    #[test]
    fn leaderboard_ties_keep_friends_ahead_of_self() {
        let friends = vec![Friend {
            id: "bot".to_string(),
            name: "Bot".to_string(),
            avatar: "🤖".to_string(),
            score: 0,
            status_message: String::new(),
        }];
        let board = leaderboard(&friends, &[], &DailyLog::new(), day(2024, 1, 10));
        assert_eq!(board[0].id, "bot");
        assert!(board[1].is_me);
    }

    #[test]
    fn daily_quote_is_stable_per_date() {
        let date = day(2024, 1, 10);
        assert_eq!(daily_quote(date), daily_quote(date));
        assert!(QUOTES.contains(&daily_quote(date)));
    }

    #[test]
    fn daily_quote_index_follows_date_hash() {
        assert_eq!(daily_quote(day(2020, 1, 1)), QUOTES[6]);
        assert_eq!(daily_quote(day(2020, 1, 2)), QUOTES[7]);
        assert_eq!(daily_quote(day(2020, 1, 3)), QUOTES[8]);
    }

    #[test]
    fn parse_date_requires_plain_iso_form() {
        assert_eq!(parse_date("2024-01-10"), Some(day(2024, 1, 10)));
        assert_eq!(parse_date(" 2024-01-10 "), Some(day(2024, 1, 10)));
        assert_eq!(parse_date("+262142-12-31"), None);
        assert_eq!(parse_date("2024-1-10"), None);
        assert_eq!(parse_date("2024-13-40"), None);
        assert_eq!(parse_date("20240110"), None);
    }

    #[test]
    fn calendar_month_layout() {
        let habits = vec![habit("a"), habit("b")];
        let mut logs = DailyLog::new();
        log_day(&mut logs, day(2024, 2, 14), &["a"]);

        let month = calendar_month(&habits, &logs, 2024, 2, day(2024, 2, 20)).unwrap();
        // 2024-02-01 is a Thursday
        assert_eq!(month.leading_blanks, 4);
        assert_eq!(month.days.len(), 29);
        assert!(month.days[13].has_data);
        assert_eq!(month.days[13].percentage, 50);
        assert!(month.days[19].is_today);
        assert!(calendar_month(&habits, &logs, 2024, 13, day(2024, 2, 20)).is_none());
    }
}
