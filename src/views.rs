//! 本地视图模板
//!
//! 静态结构 + 会话数据插值，产出挂载到内容容器的 HTML 片段。
//! 页面业务逻辑（购物车计算、批价表单、互助组 CRUD、AI 渲染）
//! 属于各页面的协作方，这里只负责容器结构与入口控件。

use agrolink_shared::Role;

use crate::session::Session;

/// HTML 转义，所有插值到模板的用户数据必须经过此函数
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn display_name(session: &Session) -> String {
    session
        .user
        .as_ref()
        .map(|user| escape_html(&user.name))
        .unwrap_or_else(|| "Guest".to_string())
}

pub fn welcome(_session: &Session) -> String {
    r#"<section class="hero min-h-[60vh] bg-base-200">
  <div class="hero-content text-center">
    <div class="max-w-md">
      <h1 class="text-4xl font-bold">Karibu AgroLink</h1>
      <p class="py-4">Connect farmers and wholesalers, trade produce, and grow together.</p>
      <div class="flex gap-2 justify-center">
        <button class="btn btn-primary" data-nav="marketplace">Browse Marketplace</button>
        <button class="btn btn-outline" data-nav="login">Sign In</button>
        <button class="btn btn-ghost" data-nav="register">Create Account</button>
      </div>
    </div>
  </div>
</section>"#
        .to_string()
}

pub fn register(_session: &Session) -> String {
    r#"<div class="card max-w-md mx-auto bg-base-100 shadow-xl">
  <form id="register-form" class="card-body">
    <h2 class="card-title">Create your account</h2>
    <input id="register-name" type="text" placeholder="Full name" class="input input-bordered" required />
    <input id="register-email" type="email" placeholder="Email" class="input input-bordered" required />
    <input id="register-password" type="password" placeholder="Password" class="input input-bordered" required />
    <select id="register-role" class="select select-bordered">
      <option value="farmer">Farmer</option>
      <option value="wholesaler">Wholesaler</option>
    </select>
    <input id="register-county" type="text" placeholder="County (optional)" class="input input-bordered" />
    <input id="register-phone" type="tel" placeholder="Phone (optional)" class="input input-bordered" />
    <button class="btn btn-primary mt-2" type="submit">Register</button>
  </form>
</div>"#
        .to_string()
}

pub fn dashboard(session: &Session) -> String {
    let name = display_name(session);
    let role = session.user.as_ref().map(|u| u.role);

    let role_card = match role {
        Some(Role::Farmer) => {
            r#"<button class="btn btn-secondary" data-nav="sacco">My SACCO Groups</button>"#
        }
        Some(Role::Wholesaler) => {
            r#"<button class="btn btn-secondary" data-nav="wholesaler">Wholesaler Hub</button>"#
        }
        Some(Role::Admin) => {
            r#"<button class="btn btn-secondary" data-nav="admin">Admin Panel</button>"#
        }
        None => "",
    };

    format!(
        r#"<div class="p-6">
  <h1 class="text-3xl font-bold mb-4">Welcome back, {name}</h1>
  <div class="flex flex-wrap gap-2">
    <button class="btn btn-primary" data-nav="marketplace">Marketplace</button>
    <button class="btn btn-primary" data-nav="chat">Ask the Assistant</button>
    <button class="btn btn-outline" data-nav="profile">My Profile</button>
    <button class="btn btn-outline" data-nav="recommendations">Recommendations</button>
    {role_card}
  </div>
  <div id="dashboard-insights" class="mt-6"></div>
</div>"#
    )
}

pub fn chat(session: &Session) -> String {
    let name = display_name(session);
    format!(
        r#"<div class="p-6 flex flex-col h-full">
  <h1 class="text-2xl font-bold mb-2">AI Assistant</h1>
  <p class="text-sm opacity-70 mb-4">Jambo {name}, ask anything about crops, prices or logistics.</p>
  <div id="chat-messages" class="flex-1 overflow-y-auto space-y-2"></div>
  <form id="chat-form" class="mt-4 flex gap-2">
    <input id="chat-input" type="text" class="input input-bordered flex-1" placeholder="Type a message" />
    <button class="btn btn-primary" type="submit">Send</button>
  </form>
</div>"#
    )
}

pub fn marketplace(_session: &Session) -> String {
    r#"<div class="p-6">
  <h1 class="text-2xl font-bold mb-4">Marketplace</h1>
  <div id="marketplace-filters" class="mb-4"></div>
  <div id="marketplace-grid" class="grid grid-cols-1 md:grid-cols-3 gap-4"></div>
</div>"#
        .to_string()
}

pub fn profile(session: &Session) -> String {
    let (name, email, county, phone, role) = session
        .user
        .as_ref()
        .map(|u| {
            (
                escape_html(&u.name),
                escape_html(&u.email),
                escape_html(u.county.as_deref().unwrap_or("")),
                escape_html(u.phone.as_deref().unwrap_or("")),
                u.role.as_str(),
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="card max-w-md mx-auto bg-base-100 shadow-xl">
  <form id="profile-form" class="card-body">
    <h2 class="card-title">My Profile</h2>
    <label class="label">Name</label>
    <input id="profile-name" type="text" value="{name}" class="input input-bordered" required />
    <label class="label">Email</label>
    <input type="email" value="{email}" class="input input-bordered" disabled />
    <label class="label">Role</label>
    <input type="text" value="{role}" class="input input-bordered" disabled />
    <label class="label">County</label>
    <input id="profile-county" type="text" value="{county}" class="input input-bordered" />
    <label class="label">Phone</label>
    <input id="profile-phone" type="tel" value="{phone}" class="input input-bordered" />
    <button class="btn btn-primary mt-2" type="submit">Save Changes</button>
  </form>
</div>"#
    )
}

pub fn sacco(session: &Session) -> String {
    let name = display_name(session);
    format!(
        r#"<div class="p-6">
  <h1 class="text-2xl font-bold mb-2">SACCO Groups</h1>
  <p class="text-sm opacity-70 mb-4">{name}, pool orders with nearby farmers for better prices.</p>
  <div id="sacco-groups" class="space-y-4"></div>
</div>"#
    )
}

pub fn wholesaler(_session: &Session) -> String {
    r#"<div class="p-6">
  <h1 class="text-2xl font-bold mb-4">Wholesaler Hub</h1>
  <div id="wholesaler-inventory" class="mb-6"></div>
  <div id="wholesaler-bulk-pricing"></div>
</div>"#
        .to_string()
}

pub fn admin(_session: &Session) -> String {
    r#"<div class="p-6">
  <h1 class="text-2xl font-bold mb-4">Administration</h1>
  <div id="admin-users" class="mb-6"></div>
  <div id="admin-listings"></div>
</div>"#
        .to_string()
}
