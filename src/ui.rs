use crate::models::AppData;
use crate::stats;
use chrono::{Duration, NaiveDate};

pub fn render_index(data: &AppData, date: NaiveDate, today: NaiveDate) -> String {
    let key = stats::date_key(date);
    let percentage = stats::completion_percentage(&data.habits, &data.logs, date);
    let quote = stats::daily_quote(date);
    let insights = stats::insights_at(today, &data.habits, &data.logs);
    let done = data.logs.get(&key).cloned().unwrap_or_default();

    let title = if date == today {
        "오늘".to_string()
    } else {
        key.clone()
    };

    let mut habits = String::new();
    for habit in data.habits.iter().filter(|habit| habit.is_active()) {
        let checked = done.contains(&habit.id);
        habits.push_str(&format!(
            r#"<li><form method="post" action="/habits/{id}/toggle"><input type="hidden" name="date" value="{key}" /><button type="submit" class="habit{class}">{mark} {name}</button></form></li>"#,
            id = escape(&habit.id),
            class = if checked { " done" } else { "" },
            mark = if checked { "✓" } else { "○" },
            name = escape(&habit.name),
        ));
    }
    if habits.is_empty() {
        habits.push_str(r#"<li class="empty">아직 습관이 없습니다.</li>"#);
    }

    let top = insights
        .top_habits
        .iter()
        .map(|top| format!("<li>{} · {}회</li>", escape(&top.name), top.count))
        .collect::<String>();
    let worst = insights
        .worst_weekday
        .as_ref()
        .map_or("-".to_string(), |worst| worst.name.clone());

    let prev = date
        .checked_sub_signed(Duration::days(1))
        .map(|prev| nav_link(prev, "previous day", "‹"))
        .unwrap_or_default();
    let next = date
        .checked_add_signed(Duration::days(1))
        .map(|next| nav_link(next, "next day", "›"))
        .unwrap_or_default();

    INDEX_HTML
        .replace("{{TITLE}}", &title)
        .replace("{{PREV}}", &prev)
        .replace("{{NEXT}}", &next)
        .replace("{{PERCENT}}", &format!("{:.0}", percentage))
        .replace("{{QUOTE}}", quote.text)
        .replace("{{AUTHOR}}", quote.author)
        .replace("{{HABITS}}", &habits)
        .replace("{{WEEKLY}}", &insights.weekly_rate.to_string())
        .replace("{{WORST}}", &worst)
        .replace("{{TOP}}", &top)
}

fn nav_link(date: NaiveDate, label: &str, glyph: &str) -> String {
    format!(
        r#"<a href="/?date={}" aria-label="{label}">{glyph}</a>"#,
        stats::date_key(date)
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('{', "&#123;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Orb</title>
  <style>
    :root {
      --bg: #000;
      --ink: #f5f5f5;
      --muted: #9ca3af;
      --teal: #2dd4bf;
      --purple: #c084fc;
      --card: rgba(255, 255, 255, 0.05);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, sans-serif;
      display: grid;
      place-items: start center;
      padding: 24px 16px 48px;
    }

    .app {
      width: min(460px, 100%);
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    header a {
      color: var(--muted);
      text-decoration: none;
      font-size: 1.4rem;
      padding: 4px 10px;
    }

    h1 {
      margin: 0;
      font-size: 1.2rem;
    }

    .orb {
      width: 220px;
      height: 220px;
      margin: 0 auto;
      border-radius: 50%;
      background: conic-gradient(var(--teal) calc({{PERCENT}} * 1%), var(--card) 0);
      display: grid;
      place-items: center;
    }

    .orb span {
      width: 180px;
      height: 180px;
      border-radius: 50%;
      background: var(--bg);
      display: grid;
      place-items: center;
      font-size: 2.4rem;
      font-weight: 700;
    }

    blockquote {
      margin: 0;
      text-align: center;
      color: var(--muted);
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .habit {
      width: 100%;
      text-align: left;
      padding: 14px 18px;
      border-radius: 16px;
      border: 1px solid rgba(255, 255, 255, 0.08);
      background: var(--card);
      color: var(--ink);
      font-size: 1rem;
      cursor: pointer;
    }

    .habit.done {
      border-color: var(--teal);
      color: var(--teal);
    }

    .empty {
      color: var(--muted);
      text-align: center;
    }

    .new-habit {
      display: flex;
      gap: 8px;
    }

    .new-habit input {
      flex: 1;
      padding: 12px 14px;
      border-radius: 12px;
      border: 1px solid rgba(255, 255, 255, 0.1);
      background: var(--card);
      color: var(--ink);
    }

    .new-habit button {
      padding: 12px 18px;
      border: none;
      border-radius: 12px;
      background: var(--teal);
      color: #000;
      font-weight: 600;
    }

    .insights {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 12px;
    }

    .stat {
      background: var(--card);
      border-radius: 16px;
      padding: 14px;
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.4rem;
      font-weight: 600;
      color: var(--purple);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      {{PREV}}
      <h1>{{TITLE}}</h1>
      {{NEXT}}
    </header>

    <div class="orb"><span>{{PERCENT}}%</span></div>

    <blockquote>"{{QUOTE}}"<br /><small>{{AUTHOR}}</small></blockquote>

    <ul>{{HABITS}}</ul>

    <form class="new-habit" method="post" action="/habits">
      <input name="name" placeholder="새로운 습관" autocomplete="off" />
      <button type="submit">추가</button>
    </form>

    <section class="insights">
      <div class="stat">
        <span class="label">이번 주 성공률</span>
        <span class="value">{{WEEKLY}}%</span>
      </div>
      <div class="stat">
        <span class="label">가장 약한 요일</span>
        <span class="value">{{WORST}}</span>
      </div>
    </section>

    <section>
      <ul>{{TOP}}</ul>
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_links_neighbouring_days() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let html = render_index(&AppData::default(), date, date);
        assert!(html.contains(r#"href="/?date=2024-01-09""#));
        assert!(html.contains(r#"href="/?date=2024-01-11""#));
        assert!(html.contains("오늘"));
    }

    #[test]
    fn index_at_calendar_edge_omits_missing_link() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let html = render_index(&AppData::default(), NaiveDate::MAX, today);
        assert!(html.contains("previous day"));
        assert!(!html.contains("next day"));

        let html = render_index(&AppData::default(), NaiveDate::MIN, today);
        assert!(!html.contains("previous day"));
        assert!(html.contains("next day"));
    }
}
