pub fn render_page(app: &str) -> String {
    INDEX_HTML.replace("{{APP}}", app)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habits</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f3f5fb;
      --bg-2: #cfd8f7;
      --ink: #232530;
      --muted: #6b6f80;
      --accent: #5051f9;
      --danger: #e05656;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(35, 37, 48, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top left, var(--bg-2), transparent 55%),
        linear-gradient(135deg, var(--bg-1), #eef0fa 60%, #f8f9fd 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    form.action {
      display: contents;
    }

    .app {
      display: grid;
      grid-template-columns: 96px 1fr;
      min-height: 100vh;
    }

    .menu {
      background: var(--card);
      box-shadow: var(--shadow);
      display: flex;
      flex-direction: column;
      align-items: center;
      gap: 18px;
      padding: 28px 0;
    }

    .menu nav, .menu__list {
      display: flex;
      flex-direction: column;
      gap: 14px;
    }

    .menu__item, .menu__add {
      width: 52px;
      height: 52px;
      border-radius: 16px;
      border: 1px solid #e3e5f0;
      background: #fff;
      font-size: 1.4rem;
      cursor: pointer;
      transition: transform 150ms ease, background 150ms ease;
    }

    .menu__item:hover, .menu__add:hover {
      transform: translateY(-2px);
    }

    .menu__item_active {
      background: var(--accent);
      border-color: var(--accent);
    }

    .menu__add {
      color: var(--accent);
      font-weight: 600;
    }

    .content {
      padding: 40px clamp(18px, 5vw, 64px);
      display: grid;
      gap: 24px;
      align-content: start;
    }

    .header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 24px;
      flex-wrap: wrap;
    }

    .h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    .progress {
      width: min(320px, 100%);
      display: grid;
      gap: 8px;
    }

    .progress__text {
      display: flex;
      justify-content: space-between;
      color: var(--muted);
    }

    .progress__percent {
      color: var(--ink);
      font-weight: 600;
    }

    .progress__bar {
      height: 8px;
      border-radius: 999px;
      background: #e3e5f0;
      overflow: hidden;
    }

    .progress__cover-bar {
      height: 100%;
      background: var(--accent);
      border-radius: 999px;
      transition: width 300ms ease;
    }

    .status {
      padding: 12px 16px;
      border-radius: 14px;
      background: rgba(224, 86, 86, 0.12);
      color: var(--danger);
    }

    .status_hidden {
      display: none;
    }

    .days-list {
      display: grid;
      gap: 12px;
    }

    .habit {
      display: grid;
      grid-template-columns: 110px 1fr auto;
      align-items: center;
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      overflow: hidden;
    }

    .habit__day {
      padding: 18px;
      background: #fff;
      font-weight: 600;
      text-align: center;
      border-right: 1px solid #e3e5f0;
    }

    .habit__comment {
      padding: 12px 18px;
      display: flex;
      gap: 12px;
      align-items: center;
    }

    .habit__delete, .popup__close {
      border: none;
      background: transparent;
      color: var(--muted);
      font-size: 1.1rem;
      padding: 0 18px;
      cursor: pointer;
    }

    .habit__delete:hover {
      color: var(--danger);
    }

    .habit_next {
      grid-template-columns: 110px 1fr;
    }

    .input {
      flex: 1;
      border: 1px solid #e3e5f0;
      border-radius: 12px;
      padding: 12px 14px;
      font: inherit;
      background: #fff;
    }

    .input.error {
      border-color: var(--danger);
      background: rgba(224, 86, 86, 0.06);
    }

    .button {
      border: none;
      border-radius: 12px;
      padding: 12px 20px;
      font: inherit;
      font-weight: 600;
      color: #fff;
      background: var(--accent);
      cursor: pointer;
    }

    .cover {
      position: fixed;
      inset: 0;
      background: rgba(35, 37, 48, 0.4);
      display: grid;
      place-items: center;
      padding: 18px;
    }

    .cover_hidden {
      display: none;
    }

    .popup {
      width: min(420px, 100%);
      background: #fff;
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 14px;
      position: relative;
    }

    .popup h2 {
      margin: 0;
      font-family: "Fraunces", "Georgia", serif;
    }

    .popup__close {
      position: absolute;
      top: 18px;
      right: 6px;
    }

    .popup__form {
      display: grid;
      gap: 12px;
    }

    @media (max-width: 640px) {
      .app {
        grid-template-columns: 1fr;
      }

      .menu {
        flex-direction: row;
        justify-content: center;
        padding: 14px;
      }

      .menu nav, .menu__list {
        flex-direction: row;
      }

      .habit {
        grid-template-columns: 80px 1fr auto;
      }
    }
  </style>
</head>
<body>
  {{APP}}
</body>
</html>
"#;
