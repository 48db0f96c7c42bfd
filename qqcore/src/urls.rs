//! Endpoints and fixed headers of the web client (the 2016 SmartQQ API).

pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:51.0) Gecko/20100101 Firefox/51.0";

pub const CLIENT_ID: u64 = 53999199;
pub const APP_ID: u64 = 501004106;

pub const LOGIN_PREPARE: &str = "https://xui.ptlogin2.qq.com/cgi-bin/xlogin?daid=164&target=self&style=40&mibao_css=m_webqq&appid=501004106&enable_qlogin=0&no_verifyimg=1&s_url=http%3A%2F%2Fw.qq.com%2Fproxy.html&f_url=loginerroralert&strong_login=1&login_state=10&t=20131024001";

pub const QR_CODE: &str =
    "https://ssl.ptlogin2.qq.com/ptqrshow?appid=501004106&e=0&l=M&s=5&d=72&v=4&t=0.1";

pub const PTQRLOGIN_REFERER: &str = LOGIN_PREPARE;
pub const PTLOGIN4_REFERER: &str = "http://s.web2.qq.com/proxy.html?v=20130916001&callback=1&id=1";
pub const VFWEBQQ_REFERER: &str = "http://s.web2.qq.com/proxy.html?v=20130916001&callback=1&id=1";

pub const LOGIN2: &str = "http://d1.web2.qq.com/channel/login2";
pub const LOGIN2_ORIGIN: &str = "http://d1.web2.qq.com";
pub const LOGIN2_REFERER: &str = "http://d1.web2.qq.com/proxy.html?v=20151105001&callback=1&id=2";

pub const POLL: &str = "http://d1.web2.qq.com/channel/poll2";
pub const MSG_ORIGIN: &str = "http://d1.web2.qq.com";

pub const GET_BUDDY: &str = "http://s.web2.qq.com/api/get_user_friends2";
pub const GET_GROUP: &str = "http://s.web2.qq.com/api/get_group_name_list_mask2";

pub const REFERER_130916: &str = "http://s.web2.qq.com/proxy.html?v=20130916001&callback=1&id=1";
pub const REFERER_151105: &str = "http://d1.web2.qq.com/proxy.html?v=20151105001&callback=1&id=2";

/// Scan status URL. `elapsed_ms` is the time since the QR code was shown.
pub fn ptqrlogin(ptqrtoken: u32, elapsed_ms: u128) -> String {
    format!(
        "https://ssl.ptlogin2.qq.com/ptqrlogin?ptqrtoken={ptqrtoken}&webqq_type=10&remember_uin=1&login2qq=1&aid={APP_ID}&u1=http%3A%2F%2Fw.qq.com%2Fproxy.html%3Flogin2qq%3D1%26webqq_type%3D10&ptredirect=0&ptlang=2052&daid=164&from_ui=1&pttype=1&dumy=&fp=loginerroralert&action=0-0-{elapsed_ms}&mibao_css=m_webqq&t=undefined&g=1&js_type=0&js_ver=10203&login_sig=&pt_randsalt=0"
    )
}

pub fn vfwebqq(ptwebqq: &str) -> String {
    format!(
        "http://s.web2.qq.com/api/getvfwebqq?ptwebqq={}&clientid={CLIENT_ID}&psessionid=&t=0.1",
        urlencoding::encode(ptwebqq)
    )
}

pub fn get_discu(vfwebqq: &str, psessionid: &str) -> String {
    format!(
        "http://s.web2.qq.com/api/get_discus_list?clientid={CLIENT_ID}&psessionid={}&vfwebqq={}&t=0.1",
        urlencoding::encode(psessionid),
        urlencoding::encode(vfwebqq)
    )
}

pub fn online_buddies(vfwebqq: &str, psessionid: &str) -> String {
    format!(
        "http://d1.web2.qq.com/channel/get_online_buddies2?vfwebqq={}&clientid={CLIENT_ID}&psessionid={}&t=0.1",
        urlencoding::encode(vfwebqq),
        urlencoding::encode(psessionid)
    )
}
