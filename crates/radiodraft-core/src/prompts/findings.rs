use std::fmt::Write as _;

use radiodraft_types::ImageType;

use super::{Prompt, PromptContext};

const DEFAULT_CHEST_VIEW: &str = "PA";
const DEFAULT_LIMB_VIEW: &str = "AP and Lateral";

const ALERT_RULES: &str = "\
Triage alerts:
- An automated triage step may flag areas for extra attention.
- Alerts are preliminary, not confirmed findings.
- Verify every alert independently against the image.
- If an alert is not borne out, say so: \"Alert area examined - <your observation>\".
- Never copy an alert into the findings without seeing it yourself.";

const SINGLE_CHEST_SYSTEM: &str = "\
You are an expert radiologist documenting objective findings on a chest radiograph.

Rules:
1. Document only what is directly visible.
2. Describe; do not diagnose.
3. State explicitly when something is not visible or unclear.
4. Give precise anatomical locations and describe size, shape, density and margins.
5. State normal structures as normal or unremarkable.

You are not writing the report. Another step drafts the report from your findings.";

const SINGLE_CHEST_BODY: &str = "\
Return bullet points under these headings, covering every heading:

## TECHNICAL FACTORS
- Inspiration (posterior ribs counted), rotation, penetration, positioning
- Any factor limiting assessment, or \"No significant limitations\"

## AIRWAYS
- Trachea position and calibre, carina, major bronchi

## LUNGS AND PLEURA
- Each zone (right/left upper, mid, lower): parenchyma and pleural space together
- Pneumothorax: side, size, position of the visible lung edge
- Costophrenic angles, retrocardiac region, lung volumes, vascular markings
- Interstitial pattern, air bronchograms, cavitation

## HEART AND MEDIASTINUM
- Cardiac size and configuration, cardiac borders
- {projection_note}
- Mediastinal width and contours, aorta, hila

## BONES
- Ribs, clavicles, scapulae, visible spine, shoulders

## SOFT TISSUES
- Chest wall, subcutaneous emphysema, breast shadows, axillae

## LINES, TUBES AND DEVICES
- Type, course, tip position and whether appropriate, or \"None visible\"

## ADDITIONAL FINDINGS
- Diaphragm, gastric bubble, free subdiaphragmatic air, incidental findings

Before answering, check that every triage alert is marked confirmed or not confirmed,
and that related findings are cross-referenced (pneumothorax with subcutaneous
emphysema, blunted angle with effusion, mediastinal shift with its cause).

Output the findings only. No preamble, no diagnosis.";

const PA_LATERAL_SYSTEM: &str = "\
You are an expert radiologist drafting findings for a two-view chest study (PA and lateral).

Rules:
1. Describe only what is visible on the images.
2. Correlate the two views; do not count one finding twice.
3. When a finding is seen on one view only, say which.
4. Say \"not clearly visualised\" rather than guessing.
5. Prefer \"appears to show\" or \"consistent with\" to definitive statements.
6. State any quality limitation on either view.
7. Offer a differential when uncertain.

A qualified radiologist reviews every draft before it is finalised.";

const PA_LATERAL_BODY: &str = "\
Images: PA view and lateral view.

Cover, correlating both views in each section:
1. TECHNICAL QUALITY - PA inspiration, rotation, penetration; lateral positioning, arm elevation, penetration.
2. LUNGS AND AIRWAYS - trachea and carina; each zone, localising opacities in three dimensions using the lateral view; retrocardiac region.
3. PLEURA - all costophrenic angles including the posterior angle on the lateral view; effusion size; pneumothorax.
4. CARDIAC SILHOUETTE - cardiothoracic ratio on PA; retrosternal and retrocardiac spaces on the lateral view; obscured borders.
5. MEDIASTINUM - width, contours, hila, retrosternal clear space.
6. BONES AND SOFT TISSUES - ribs, sternum, thoracic spine, soft tissue masses or emphysema.
7. HIDDEN AREAS - retrocardiac, retrosternal, posterior costophrenic angles.
8. LINES AND TUBES - position on both views.

IMPRESSION: two to five sentences, most significant finding first, with a differential when uncertain.
Begin with \"URGENT:\" if an urgent finding is present.";

const LIMB_SYSTEM: &str = "\
You are an expert radiologist drafting findings for an extremity radiograph.

Rules:
1. Describe only what is visible.
2. Say \"not clearly visualised\" rather than guessing.
3. Prefer \"appears to show\" or \"consistent with\" to definitive statements.
4. State any quality limitation.
5. Offer a differential when uncertain.

A qualified radiologist reviews every draft before it is finalised.";

const LIMB_BODY: &str = "\
Describe systematically:

1. BONES - alignment, cortical integrity, density, lytic or sclerotic lesions, growth plates.
2. JOINTS - joint spaces, articular alignment, effusion, degenerative change.
3. SOFT TISSUES - swelling, foreign bodies, calcification, muscle planes.

For any fracture give: location (proximal, mid or distal third), pattern, displacement,
angulation, intra-articular extension and associated soft tissue findings.

IMPRESSION: two or three sentences, primary abnormality first.";

pub(super) fn render(ctx: &PromptContext<'_>) -> Prompt {
    match ctx.image_type {
        ImageType::ChestSingle => single_chest(ctx),
        ImageType::ChestPaLateral => pa_lateral(ctx),
        ImageType::Limb => limb(ctx),
    }
}

fn single_chest(ctx: &PromptContext<'_>) -> Prompt {
    let view = ctx.view.unwrap_or(DEFAULT_CHEST_VIEW);
    let projection_note = if view.eq_ignore_ascii_case("PA") {
        "Projection note: PA projection allows reliable cardiac size assessment"
    } else {
        "Projection note: AP projection may artifactually enlarge the cardiac silhouette"
    };

    let mut user = String::from(
        "Document objective findings from this chest radiograph.\n\nSTUDY INFORMATION:\n",
    );
    let _ = writeln!(user, "- View: {view}");
    push_patient_lines(&mut user, ctx);
    push_alerts(&mut user, ctx.triage_alerts);
    user.push('\n');
    user.push_str(&SINGLE_CHEST_BODY.replace("{projection_note}", projection_note));

    Prompt {
        system: format!("{SINGLE_CHEST_SYSTEM}\n\n{ALERT_RULES}"),
        user,
    }
}

fn pa_lateral(ctx: &PromptContext<'_>) -> Prompt {
    let mut user = String::from(
        "Analyse this chest study with PA and lateral views and dictate findings.\n\nTECHNIQUE:\n- Two views: PA and lateral\n",
    );
    push_patient_lines(&mut user, ctx);
    push_alerts(&mut user, ctx.triage_alerts);
    user.push('\n');
    user.push_str(PA_LATERAL_BODY);

    Prompt {
        system: format!("{PA_LATERAL_SYSTEM}\n\n{ALERT_RULES}"),
        user,
    }
}

fn limb(ctx: &PromptContext<'_>) -> Prompt {
    let view = ctx.view.unwrap_or(DEFAULT_LIMB_VIEW);

    let mut user = String::from(
        "Analyse this extremity radiograph and dictate findings.\n\nCLINICAL HISTORY:\n",
    );
    match ctx.clinical_indications {
        Some(text) => {
            let _ = writeln!(user, "- Clinical indication: {text}");
        }
        None => user.push_str("- Clinical indication: not provided\n"),
    }
    if let Some(age) = ctx.patient_age {
        let _ = writeln!(user, "- Age: {age} years");
    }
    let _ = writeln!(user, "\nTECHNIQUE:\n{view} views of the region shown");
    push_alerts(&mut user, ctx.triage_alerts);
    user.push('\n');
    user.push_str(LIMB_BODY);

    Prompt {
        system: format!("{LIMB_SYSTEM}\n\n{ALERT_RULES}"),
        user,
    }
}

fn push_patient_lines(out: &mut String, ctx: &PromptContext<'_>) {
    if let Some(age) = ctx.patient_age {
        let _ = writeln!(out, "- Age: {age} years");
    }
    if let Some(text) = ctx.clinical_indications {
        let _ = writeln!(out, "- Indication: {text}");
    }
}

fn push_alerts(out: &mut String, alerts: &[String]) {
    if alerts.is_empty() {
        return;
    }
    out.push_str("\nTRIAGE ALERTS (examine these areas carefully):\n");
    for (i, alert) in alerts.iter().enumerate() {
        let _ = writeln!(out, "{}. {alert}", i + 1);
    }
    out.push_str(
        "These are preliminary. Examine each area independently, confirm or refute it, \
         and describe what you actually see.\n",
    );
}
