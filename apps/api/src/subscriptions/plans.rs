use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub features: &'static [&'static str],
}

pub const PLANS: &[Plan] = &[
    Plan {
        id: "basic",
        name: "Basic",
        price: "Free",
        features: &[
            "Resume analysis",
            "Basic templates",
            "LinkedIn profile tips",
        ],
    },
    Plan {
        id: "pro",
        name: "Pro",
        price: "$9.99/month",
        features: &[
            "Everything in Basic",
            "Premium templates",
            "Unlimited resume analyses",
            "LinkedIn profile analysis",
        ],
    },
    Plan {
        id: "premium",
        name: "Premium",
        price: "$19.99/month",
        features: &[
            "Everything in Pro",
            "Priority support",
            "Cover letter templates",
        ],
    },
];

pub fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}
