//! Fixed marketing content: company identity and the service catalog.

pub const COMPANY_NAME: &str = "محترفين الديار العالمية";
pub const TAGLINE: &str = "مظلات وبرجولات وسواتر وتنسيق حدائق في جدة والمنطقة الغربية";

pub struct Service {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub highlights: &'static [&'static str],
    /// Project category the service's portfolio link filters on.
    pub category: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service {
        slug: "mazallat",
        title: "مظلات",
        summary: "مظلات سيارات ومظلات حدائق ومسابح بخامات مقاومة للحرارة والأشعة فوق البنفسجية.",
        highlights: &["قماش PVC ألماني", "هياكل حديد مجلفن", "ضمان يصل إلى 10 سنوات"],
        category: "مظلات",
    },
    Service {
        slug: "pergolas",
        title: "برجولات",
        summary: "برجولات خشبية وحديدية بتصاميم عصرية للحدائق والأسطح والجلسات الخارجية.",
        highlights: &["خشب معالج", "تصاميم حسب الطلب", "إضاءة مدمجة"],
        category: "برجولات",
    },
    Service {
        slug: "sawater",
        title: "سواتر",
        summary: "سواتر خصوصية للأسوار والأسطح من الحديد والقماش والخشب الصناعي.",
        highlights: &["خصوصية تامة", "ألوان متعددة", "تركيب سريع"],
        category: "سواتر",
    },
    Service {
        slug: "sandwich-panel",
        title: "ساندوتش بانل",
        summary: "غرف وملاحق ومستودعات من ألواح الساندوتش بانل المعزولة حرارياً.",
        highlights: &["عزل حراري وصوتي", "تنفيذ خلال أيام", "مقاومة للحريق"],
        category: "ساندوتش بانل",
    },
    Service {
        slug: "renovation",
        title: "ترميم",
        summary: "ترميم الملاحق والمباني وأعمال الدهانات والعزل والتشطيبات.",
        highlights: &["معاينة مجانية", "فريق متخصص", "التزام بالمواعيد"],
        category: "ترميم",
    },
    Service {
        slug: "landscaping",
        title: "تنسيق حدائق",
        summary: "تصميم وتنفيذ الحدائق المنزلية بالعشب الطبيعي والصناعي وأنظمة الري.",
        highlights: &["عشب صناعي وطبيعي", "شبكات ري", "أحواض ونوافير"],
        category: "تنسيق حدائق",
    },
    Service {
        slug: "byoot-shaar",
        title: "بيوت شعر",
        summary: "بيوت شعر تراثية ومجالس خارجية بتجهيزات كاملة.",
        highlights: &["تصاميم تراثية", "عزل من الأمطار", "تجهيز داخلي"],
        category: "بيوت شعر",
    },
    Service {
        slug: "khayyam",
        title: "خيام",
        summary: "خيام ملكية وخيام مناسبات وخيام استراحات بأحجام مختلفة.",
        highlights: &["أقمشة عالية الجودة", "أحجام متعددة", "تركيب وفك"],
        category: "خيام",
    },
];

pub fn find_service(slug: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.slug == slug)
}

/// Public pages listed in the sitemap, relative to the base URL.
pub fn static_pages() -> Vec<String> {
    let mut pages = vec![String::new(), "/portfolio".to_string()];
    pages.extend(SERVICES.iter().map(|s| format!("/services/{}", s.slug)));
    pages
}
